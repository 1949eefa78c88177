use std::io::{ErrorKind, Read};

use log::info;
use revmix_core::{CaptureDevice, CaptureError, CaptureFormat, Sample};

/// A capture device reading interleaved signed 16-bit little-endian PCM from a reader.
///
/// This is how microphone audio gets in: the OS capture tool is piped into the reader,
/// for example `arecord -f S16_LE -r 44100 -c 1 | revmix submit --record`.
pub struct PcmStreamCapture<R> {
    reader: Option<R>,
    open: bool,
    /// A byte left over from a read that ended halfway through a sample
    pending: Option<u8>,
}

impl<R> PcmStreamCapture<R>
where
    R: Read + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            open: false,
            pending: None,
        }
    }
}

impl<R> CaptureDevice for PcmStreamCapture<R>
where
    R: Read + Send,
{
    fn open(&mut self, format: CaptureFormat) -> Result<(), CaptureError> {
        if self.open {
            return Err(CaptureError::Busy);
        }

        if self.reader.is_none() {
            return Err(CaptureError::Unavailable(
                "the input stream was already consumed".to_string(),
            ));
        }

        info!(
            "Capturing {} channel(s) at {}Hz from stream",
            format.channel_count, format.sample_rate
        );

        self.open = true;
        Ok(())
    }

    fn read(&mut self, buf: &mut [Sample]) -> Result<usize, CaptureError> {
        if !self.open {
            return Err(CaptureError::NotOpen);
        }

        let reader = self.reader.as_mut().ok_or(CaptureError::NotOpen)?;

        if buf.is_empty() {
            return Ok(0);
        }

        let mut bytes = vec![0u8; buf.len() * 2];
        let offset = match self.pending.take() {
            Some(byte) => {
                bytes[0] = byte;
                1
            }
            None => 0,
        };

        // Keep reading until a whole sample is available, since 0 means the input ended
        let mut available = offset;
        while available < 2 {
            match reader.read(&mut bytes[available..]) {
                Ok(0) => break,
                Ok(read) => available += read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let whole = available / 2;

        if available % 2 == 1 {
            self.pending = Some(bytes[available - 1]);
        }

        for (sample, chunk) in buf.iter_mut().zip(bytes[..whole * 2].chunks_exact(2)) {
            let value = i16::from_le_bytes([chunk[0], chunk[1]]);
            *sample = value as Sample / i16::MAX as Sample;
        }

        if whole == 0 {
            self.pending = None;
        }

        Ok(whole)
    }

    fn close(&mut self) {
        if self.open {
            // The stream can't be rewound, so it is released for good
            self.reader = None;
            self.open = false;
            self.pending = None;
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use assert_matches::assert_matches;
    use revmix_core::{CaptureDevice, CaptureError, CaptureFormat};

    use super::PcmStreamCapture;

    #[test]
    fn samples_are_decoded_from_little_endian_pcm() {
        let pcm: Vec<u8> = [0i16, i16::MAX, -i16::MAX]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();

        let mut capture = PcmStreamCapture::new(Cursor::new(pcm));
        let mut buf = [0.; 8];

        assert_matches!(capture.read(&mut buf), Err(CaptureError::NotOpen));

        capture.open(CaptureFormat::default()).unwrap();
        assert_matches!(capture.open(CaptureFormat::default()), Err(CaptureError::Busy));

        assert_eq!(capture.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[0., 1., -1.]);
        assert_eq!(capture.read(&mut buf).unwrap(), 0);

        capture.close();
        assert_matches!(
            capture.open(CaptureFormat::default()),
            Err(CaptureError::Unavailable(_))
        );
    }

    /// Hands out one byte per read
    struct Trickle(Vec<u8>);

    impl std::io::Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0.remove(0);
            Ok(1)
        }
    }

    #[test]
    fn split_samples_are_joined_across_reads() {
        let mut capture = PcmStreamCapture::new(Trickle(i16::MAX.to_le_bytes().to_vec()));
        let mut buf = [0.; 4];

        capture.open(CaptureFormat::default()).unwrap();

        assert_eq!(capture.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 1.);
        assert_eq!(capture.read(&mut buf).unwrap(), 0);
    }
}
