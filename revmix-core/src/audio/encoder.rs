use super::{CaptureFormat, Sample};

/// Represents a type that encodes captured [Sample]s into a file format the backend can store.
pub trait Encoder
where
    Self: 'static + Send,
{
    fn new(format: CaptureFormat) -> Self
    where
        Self: Sized;

    /// Encodes the provided samples.
    fn encode(&mut self, samples: &[Sample]);

    /// Consumes the encoder, returning the complete file.
    fn finish(self) -> Vec<u8>
    where
        Self: Sized;

    /// Returns the content type of the encoded data.
    fn content_type(&self) -> String;

    /// Returns a human friendly name
    fn name() -> String
    where
        Self: Sized;
}
