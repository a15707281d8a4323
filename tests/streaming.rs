mod common;

use common::*;
use paulstretch::{stretch_wav, StretchError, StretchParams, StretchPipeline};

fn params(stretch: f64) -> StretchParams {
    StretchParams::new(stretch).unwrap().with_seed(1234)
}

#[test]
fn test_silent_input_stays_silent_and_stretches() {
    // 1 s of 44100 Hz mono silence, stretch 8.0, window 0.25 s.
    let wav = make_wav(44100, &[vec![0.0f32; 44100]]);
    let out = stretch_wav(&wav, &params(8.0)).unwrap();

    // Mono expands to stereo by default.
    assert_eq!(header_channels(&out), 2);
    assert_eq!(header_sample_rate(&out), 44100);

    let frames = payload_frames(&out, 2);
    let expected = 8 * 44100;
    let window = 11250; // 0.25 s at 44100 Hz after size optimization
    assert!(
        (frames as i64 - expected as i64).unsigned_abs() as usize <= 2 * window,
        "expected ~{} frames, got {}",
        expected,
        frames
    );

    // Zero magnitude in, zero magnitude out regardless of random phase.
    assert!(out[44..].iter().all(|&b| b == 0));
}

#[test]
fn test_duration_scales_with_stretch_factor() {
    let input_frames = 44100;
    let signal = gen_sine(440.0, 44100, input_frames, 0.5);
    let wav = make_wav(44100, &[signal]);
    let window = 11250;

    for stretch in [1.0, 2.0, 4.0] {
        let out = stretch_wav(&wav, &params(stretch)).unwrap();
        let frames = payload_frames(&out, 2);
        let expected = (stretch * input_frames as f64) as i64;
        assert!(
            (frames as i64 - expected).unsigned_abs() as usize <= 3 * window,
            "stretch {}: expected ~{} frames, got {}",
            stretch,
            expected,
            frames
        );
    }
}

#[test]
fn test_impulse_energy_is_smeared() {
    // A single impulse becomes a wide noise burst, not a single click.
    let signal = gen_impulse(44100, 22050, 0.9);
    let wav = make_wav(44100, &[signal]);
    let out = stretch_wav(&wav, &params(4.0)).unwrap();

    let payload = &out[44..];
    let nonzero: Vec<usize> = payload
        .chunks_exact(2)
        .enumerate()
        .filter(|(_, bytes)| i16::from_le_bytes([bytes[0], bytes[1]]).unsigned_abs() > 4)
        .map(|(i, _)| i / 2) // interleaved stereo sample index -> frame
        .collect();

    assert!(
        nonzero.len() > 1000,
        "impulse energy should spread over many samples, got {}",
        nonzero.len()
    );
    let span = nonzero.last().unwrap() - nonzero.first().unwrap();
    assert!(
        span > 2 * 11250,
        "impulse should smear over multiple windows, spanned {} frames",
        span
    );
}

#[test]
fn test_output_independent_of_chunking() {
    let signal = gen_sine(330.0, 22050, 22050, 0.4);
    let wav = make_wav(22050, &[signal]);

    let run = |chunk_size: usize| -> Vec<u8> {
        let mut pipeline = StretchPipeline::new(params(4.0)).unwrap();
        let mut out = Vec::new();
        for chunk in wav.chunks(chunk_size) {
            out.extend(pipeline.process(chunk).unwrap());
        }
        out.extend(pipeline.finish().unwrap());
        out
    };

    let whole = run(wav.len());
    let large = run(4096);
    let odd = run(7);
    assert_eq!(whole, large);
    assert_eq!(whole, odd);
}

#[test]
fn test_mono_expansion_is_configurable() {
    let wav = make_wav(44100, &[gen_sine(220.0, 44100, 22050, 0.3)]);

    let expanded = stretch_wav(&wav, &params(2.0)).unwrap();
    assert_eq!(header_channels(&expanded), 2);

    let kept_mono = stretch_wav(&wav, &params(2.0).with_mono_expansion(false)).unwrap();
    assert_eq!(header_channels(&kept_mono), 1);
    assert!(payload_frames(&kept_mono, 1) > 0);
}

#[test]
fn test_stereo_stays_stereo() {
    let left = gen_sine(440.0, 44100, 22050, 0.4);
    let right = gen_sine(880.0, 44100, 22050, 0.4);
    let wav = make_wav(44100, &[left, right]);
    let out = stretch_wav(&wav, &params(2.0)).unwrap();
    assert_eq!(header_channels(&out), 2);
    assert_eq!((out.len() - 44) % 4, 0);
}

#[test]
fn test_32bit_input_accepted() {
    // Patch the header to 32-bit and widen the silent payload to match.
    let mut wav = paulstretch::wav::encode_header(44100, 1).to_vec();
    set_bit_depth(&mut wav, 32);
    wav.extend(std::iter::repeat(0u8).take(44100 * 4));

    let out = stretch_wav(&wav, &params(8.0)).unwrap();
    assert!(payload_frames(&out, 2) > 0);
    assert!(out[44..].iter().all(|&b| b == 0));
}

#[test]
fn test_nonpositive_stretch_rejected_before_processing() {
    assert!(matches!(
        StretchParams::new(0.0),
        Err(StretchError::InvalidStretchFactor(_))
    ));
    assert!(matches!(
        StretchParams::new(-4.0),
        Err(StretchError::InvalidStretchFactor(_))
    ));

    let mut params = StretchParams::new(4.0).unwrap();
    params.window_secs = -1.0;
    assert!(StretchPipeline::new(params).is_err());
}

#[test]
fn test_tiny_window_raised_not_rejected() {
    let wav = make_wav(44100, &[gen_sine(440.0, 44100, 4410, 0.5)]);
    // Far below the 16-sample floor; raised, never an error.
    let out = stretch_wav(&wav, &params(2.0).with_window_secs(0.0000001)).unwrap();
    assert!(payload_frames(&out, 2) > 0);
}

#[test]
fn test_input_shorter_than_one_window_still_flushes() {
    // 0.05 s of audio against a 0.25 s window: nothing can be emitted
    // until flush pads the tail.
    let wav = make_wav(44100, &[gen_sine(440.0, 44100, 2205, 0.5)]);
    let mut pipeline = StretchPipeline::new(params(4.0)).unwrap();
    let during = pipeline.process(&wav).unwrap();
    // Only the output header is available before end of input.
    assert_eq!(during.len(), 44);
    let tail = pipeline.finish().unwrap();
    assert!(!tail.is_empty());
}
