//! Header and footer emission around an output channel.

use crate::channel::OutputChannel;
use crate::encoder::Encoder;
use crate::errors::AppenderError;
use crate::formatter::Formatter;
use std::sync::Arc;

/// Line separator appended after a non-empty header.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Line separator appended after a non-empty header.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Concatenates the file header and presentation header, followed by one
/// line separator. `None` if both are unset or empty.
pub fn compose_header<E>(formatter: &dyn Formatter<E>) -> Option<String> {
    let mut header = concat([formatter.file_header(), formatter.presentation_header()])?;
    header.push_str(LINE_SEPARATOR);
    Some(header)
}

/// Concatenates the presentation footer and file footer. `None` if both are
/// unset or empty.
pub fn compose_footer<E>(formatter: &dyn Formatter<E>) -> Option<String> {
    concat([formatter.presentation_footer(), formatter.file_footer()])
}

fn concat(parts: [Option<String>; 2]) -> Option<String> {
    let joined: String = parts.into_iter().flatten().collect();
    (!joined.is_empty()).then_some(joined)
}

/// Output channel with an encoder and the formatter's decorations.
///
/// Every write is encoded first; header and footer writes are always
/// flushed.
pub struct DecoratedChannel<E> {
    channel: OutputChannel,
    formatter: Option<Arc<dyn Formatter<E>>>,
    encoder: Encoder,
}

impl<E> DecoratedChannel<E> {
    /// Wraps `channel`. Without a formatter no decorations are written.
    pub fn new(
        channel: OutputChannel,
        formatter: Option<Arc<dyn Formatter<E>>>,
        encoder: Encoder,
    ) -> Self {
        Self {
            channel,
            formatter,
            encoder,
        }
    }

    /// The wrapped channel.
    pub fn channel(&self) -> &OutputChannel {
        &self.channel
    }

    /// The encoder applied to every write.
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Encodes and writes `text`, flushing if `flush` is set.
    pub fn write_text(&mut self, text: &str, flush: bool) -> Result<(), AppenderError> {
        let bytes = self.encoder.encode(text);
        self.channel.write(&bytes, flush)
    }

    /// Flushes buffered bytes to the file.
    pub fn flush(&mut self) -> Result<(), AppenderError> {
        self.channel.flush()
    }

    /// Writes the header, if any.
    pub fn write_header(&mut self) -> Result<(), AppenderError> {
        let header = self.formatter.as_deref().and_then(|f| compose_header(f));
        match header {
            Some(header) => self.write_text(&header, true),
            None => Ok(()),
        }
    }

    /// Writes the footer, if any. Does nothing once the channel is closed.
    pub fn write_footer(&mut self) -> Result<(), AppenderError> {
        if !self.channel.is_open() {
            return Ok(());
        }
        let footer = self.formatter.as_deref().and_then(|f| compose_footer(f));
        match footer {
            Some(footer) => self.write_text(&footer, true),
            None => Ok(()),
        }
    }

    /// Flushes and releases the underlying file without writing the footer.
    pub fn release(&mut self) -> Result<(), AppenderError> {
        Ok(self.channel.close()?)
    }
}
