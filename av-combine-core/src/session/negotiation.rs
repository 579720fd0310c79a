use crate::models::config::CombineConfiguration;
use crate::models::error::CombineError;
use crate::models::format::OutputFormat;
use crate::models::stream::CaptureStream;
use crate::traits::media_host::MediaHost;
use crate::traits::stream_encoder::StreamEncoder;

/// First format in `preferences` that `is_supported` accepts.
pub fn select_format<'a>(
    preferences: &'a [OutputFormat],
    is_supported: impl Fn(&OutputFormat) -> bool,
) -> Option<&'a OutputFormat> {
    preferences.iter().find(|format| is_supported(format))
}

/// Create an encoder for `stream`, trying formats in preference order.
///
/// The first supported preferred format is tried; if the host supports none
/// of them, or rejects the chosen one, its default configuration is used.
/// Returns the encoder and the format its output should be tagged with.
pub fn create_encoder<H: MediaHost>(
    host: &mut H,
    stream: &CaptureStream<H::VideoTrack, H::AudioTrack>,
    config: &CombineConfiguration,
) -> Result<(H::Encoder, OutputFormat), CombineError> {
    let preferred = select_format(&config.format_preferences, |f| host.is_format_supported(f)).cloned();

    if let Some(format) = preferred {
        match host.create_encoder(stream, Some(&format)) {
            Ok(encoder) => {
                log::info!("encoder created with format {}", format);
                let tag = encoder.format().unwrap_or(format);
                return Ok((encoder, tag));
            }
            Err(e) => log::warn!("encoder rejected {}: {}; trying host default", format, e),
        }
    } else {
        log::info!("no preferred format supported; using host default encoder");
    }

    let encoder = host
        .create_encoder(stream, None)
        .map_err(|e| e.reclassify(CombineError::EncoderStart))?;
    let tag = encoder
        .format()
        .unwrap_or_else(|| config.fallback_format.clone());
    log::info!("default encoder created, output tagged {}", tag);
    Ok((encoder, tag))
}
