use crate::Result;
use crate::adapter::ResponseBody;
use rapip_core::parser::{PARSE_PHASE, parse_text_to_structured};
use rapip_core::{Millis, Timer};

/// Read and decode a streaming response body, returning how long it took.
///
/// The measurement covers receiving the remaining body as well as decoding
/// it, since both happen while the caller is suspended.
pub async fn parse_response_body(timer: &Timer, response: reqwest::Response) -> Result<Millis> {
    let pair = timer.pair(PARSE_PHASE);

    timer.start(&pair);
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            timer.discard(&pair);
            return Err(e.into());
        }
    };
    if let Err(e) = serde_json::from_slice::<serde_json::Value>(&bytes) {
        timer.discard(&pair);
        return Err(rapip_core::Error::Decode(e).into());
    }
    let elapsed = timer.finish(&pair)?;

    tracing::debug!("Parsed response body of {} bytes in {}", bytes.len(), elapsed);
    Ok(elapsed)
}

/// Decode whichever body a transport returned
pub async fn parse_body(timer: &Timer, body: ResponseBody) -> Result<Millis> {
    match body {
        ResponseBody::Pending(response) => parse_response_body(timer, response).await,
        ResponseBody::Text(text) => Ok(parse_text_to_structured(timer, &text)?),
    }
}
