use std::convert::Infallible;

/// Destination for rendered notation.
///
/// A sink receives the complete text of one conversion and replaces whatever
/// it held before; nothing is appended across conversions.
pub trait OutputSink {
    type Error;

    fn set_output(&mut self, text: &str) -> Result<(), Self::Error>;
}

impl OutputSink for String {
    type Error = Infallible;

    fn set_output(&mut self, text: &str) -> Result<(), Self::Error> {
        self.clear();
        self.push_str(text);
        Ok(())
    }
}
