use revmix_core::{CaptureFormat, Encoder, Sample};

/// Encodes captured [Sample]s into a complete 16-bit PCM .wav file
pub struct WaveEncoder {
    header: WaveHeader,
    /// Encoded sample bytes, without the header
    data: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
enum WaveHeaderValue {
    Ascii(&'static str),
    TwoBytes(u16),
    FourBytes(u32),
}

#[derive(Debug, Clone)]
struct WaveHeader {
    channel_count: u16,
    sample_rate: u32,
    bit_depth: u16,
}

impl WaveHeaderValue {
    fn to_bytes(self) -> Vec<u8> {
        match self {
            WaveHeaderValue::Ascii(x) => x.as_bytes().to_vec(),
            WaveHeaderValue::TwoBytes(x) => x.to_le_bytes().to_vec(),
            WaveHeaderValue::FourBytes(x) => x.to_le_bytes().to_vec(),
        }
    }
}

impl WaveHeader {
    const SIZE: u32 = 44;

    // ChunkID: Contains the letters "RIFF" in ASCII form
    const CHUNK_ID: WaveHeaderValue = WaveHeaderValue::Ascii("RIFF");

    // Format: Contains the letters "WAVE"
    const FORMAT: WaveHeaderValue = WaveHeaderValue::Ascii("WAVE");

    // Subchunk1ID: Contains the letters "fmt "
    const FMT_CHUNK_ID: WaveHeaderValue = WaveHeaderValue::Ascii("fmt ");

    // Subchunk1Size: 16 for PCM.
    const FMT_CHUNK_SIZE: WaveHeaderValue = WaveHeaderValue::FourBytes(16);

    // AudioFormat: PCM = 1
    const AUDIO_FORMAT: WaveHeaderValue = WaveHeaderValue::TwoBytes(1);

    // Subchunk2ID: Contains the letters "data"
    const DATA_CHUNK_ID: WaveHeaderValue = WaveHeaderValue::Ascii("data");

    /// Writes the header for a file with `data_size` bytes of samples
    fn to_bytes(&self, data_size: u32) -> Vec<u8> {
        // Everything after the ChunkSize field
        let chunk_size = WaveHeaderValue::FourBytes(Self::SIZE - 8 + data_size);

        let num_channels = WaveHeaderValue::TwoBytes(self.channel_count);
        let sample_rate = WaveHeaderValue::FourBytes(self.sample_rate);

        let byte_rate = WaveHeaderValue::FourBytes(
            self.sample_rate * self.channel_count as u32 * self.bit_depth as u32 / 8,
        );

        let block_align = WaveHeaderValue::TwoBytes(self.channel_count * self.bit_depth / 8);
        let bits_per_sample = WaveHeaderValue::TwoBytes(self.bit_depth);

        let data_chunk_size = WaveHeaderValue::FourBytes(data_size);

        [
            Self::CHUNK_ID,
            chunk_size,
            Self::FORMAT,
            Self::FMT_CHUNK_ID,
            Self::FMT_CHUNK_SIZE,
            Self::AUDIO_FORMAT,
            num_channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            Self::DATA_CHUNK_ID,
            data_chunk_size,
        ]
        .into_iter()
        .flat_map(WaveHeaderValue::to_bytes)
        .collect()
    }
}

impl Encoder for WaveEncoder {
    fn new(format: CaptureFormat) -> Self
    where
        Self: Sized,
    {
        let header = WaveHeader {
            channel_count: format.channel_count as u16,
            sample_rate: format.sample_rate as u32,
            bit_depth: 16,
        };

        Self {
            header,
            data: Vec::new(),
        }
    }

    fn encode(&mut self, samples: &[Sample]) {
        let bytes = samples
            .iter()
            .map(|s| (s.clamp(-1., 1.) * i16::MAX as Sample) as i16)
            .flat_map(|s| s.to_le_bytes());

        self.data.extend(bytes);
    }

    fn finish(self) -> Vec<u8> {
        let mut file = self.header.to_bytes(self.data.len() as u32);
        file.extend(self.data);
        file
    }

    fn content_type(&self) -> String {
        "audio/wav".to_string()
    }

    fn name() -> String
    where
        Self: Sized,
    {
        "WaveEncoder".to_string()
    }
}
