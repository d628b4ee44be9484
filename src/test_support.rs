//! Shared fixtures for unit tests.

/// Build a 16-bit PCM WAV file in memory.
///
/// `info` entries become a `LIST/INFO` chunk after the data chunk
/// (e.g. `(b"INAM", "Title")`).
pub fn wav_bytes(samples: &[i16], sample_rate: u32, channels: u16, info: &[(&[u8; 4], &str)]) -> Vec<u8> {
    let block_align = channels * 2;
    let byte_rate = sample_rate * u32::from(block_align);

    let mut fmt = Vec::new();
    fmt.extend_from_slice(&1u16.to_le_bytes());
    fmt.extend_from_slice(&channels.to_le_bytes());
    fmt.extend_from_slice(&sample_rate.to_le_bytes());
    fmt.extend_from_slice(&byte_rate.to_le_bytes());
    fmt.extend_from_slice(&block_align.to_le_bytes());
    fmt.extend_from_slice(&16u16.to_le_bytes());

    let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();

    let mut body = Vec::new();
    body.extend_from_slice(b"WAVE");
    push_chunk(&mut body, b"fmt ", &fmt);
    push_chunk(&mut body, b"data", &data);

    if !info.is_empty() {
        let mut list = Vec::new();
        list.extend_from_slice(b"INFO");
        for (id, value) in info {
            let mut v = value.as_bytes().to_vec();
            v.push(0);
            push_chunk(&mut list, id, &v);
        }
        push_chunk(&mut body, b"LIST", &list);
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

fn push_chunk(out: &mut Vec<u8>, id: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(id);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(0);
    }
}

/// One second of a full-scale square-ish tone, mono, at `rate` Hz.
pub fn tone(rate: u32) -> Vec<i16> {
    (0..rate)
        .map(|i| if (i / 20) % 2 == 0 { i16::MAX } else { i16::MIN + 1 })
        .collect()
}
