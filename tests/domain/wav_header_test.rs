use wavelift::domain::{AudioFormat, HeaderRewrite, WavHeader, WavHeaderError, has_wav_magic};

use crate::helpers::wav_bytes;

#[test]
fn given_canonical_header_when_parsing_then_fields_are_read_little_endian() {
    let bytes = wav_bytes(2, 44_100, 16, 1000);

    let header = WavHeader::parse(&bytes).unwrap();

    assert_eq!(header.riff_size(), 1036);
    assert_eq!(header.fmt_chunk_size(), 16);
    assert_eq!(header.channels(), 2);
    assert_eq!(header.sample_rate(), 44_100);
    assert_eq!(header.byte_rate(), 176_400);
    assert_eq!(header.block_align(), 4);
    assert_eq!(header.bits_per_sample(), 16);
    assert_eq!(header.data_size(), 1000);
}

#[test]
fn given_fewer_than_44_bytes_when_parsing_then_returns_malformed_header() {
    let bytes = wav_bytes(1, 16_000, 16, 0);

    let result = WavHeader::parse(&bytes[..10]);

    assert_eq!(result, Err(WavHeaderError::MalformedHeader { available: 10 }));
}

#[test]
fn given_missing_wave_tag_when_parsing_then_returns_invalid_magic() {
    let mut bytes = wav_bytes(1, 16_000, 16, 8);
    bytes[8..12].copy_from_slice(b"AVI ");

    assert_eq!(WavHeader::parse(&bytes), Err(WavHeaderError::InvalidMagic));
    assert!(!has_wav_magic(&bytes));
}

#[test]
fn given_resize_rewrite_when_reparsed_then_data_and_riff_sizes_match() {
    let header = WavHeader::parse(&wav_bytes(2, 44_100, 16, 5000)).unwrap();

    let resized = header.rewrite(HeaderRewrite::Resize { data_size: 1234 });
    let reparsed = WavHeader::parse(resized.as_bytes()).unwrap();

    assert_eq!(reparsed.data_size(), 1234);
    assert_eq!(reparsed.riff_size(), 1234 + 36);
    assert_eq!(reparsed.channels(), 2);
    assert_eq!(reparsed.sample_rate(), 44_100);
    assert_eq!(reparsed.byte_rate(), 176_400);
}

#[test]
fn given_stereo_44k_when_resampling_to_16k_mono_then_byte_rate_is_32000() {
    let header = WavHeader::parse(&wav_bytes(2, 44_100, 16, 4000)).unwrap();

    let rewritten = header.rewrite(HeaderRewrite::Resample {
        format: AudioFormat::new(16_000, 1, 16),
        total_file_size: 4044,
    });

    assert_eq!(rewritten.channels(), 1);
    assert_eq!(rewritten.sample_rate(), 16_000);
    assert_eq!(rewritten.byte_rate(), 32_000);
    assert_eq!(rewritten.block_align(), 2);
    assert_eq!(rewritten.bits_per_sample(), 16);
    assert_eq!(rewritten.fmt_chunk_size(), 16);
    assert_eq!(rewritten.riff_size(), 4036);
}

#[test]
fn given_resample_rewrite_when_applied_then_unrelated_bytes_are_preserved() {
    let original = WavHeader::parse(&wav_bytes(2, 44_100, 16, 4000)).unwrap();

    let rewritten = original.rewrite(HeaderRewrite::Resample {
        format: AudioFormat::default(),
        total_file_size: 4044,
    });

    let (before, after) = (original.as_bytes(), rewritten.as_bytes());
    assert_eq!(before[0..4], after[0..4]);
    assert_eq!(before[8..16], after[8..16]);
    assert_eq!(before[20..22], after[20..22]);
    assert_eq!(before[36..44], after[36..44]);
    assert_eq!(rewritten.data_size(), 4000);
}

#[test]
fn given_resize_rewrite_when_applied_then_format_fields_are_untouched() {
    let original = WavHeader::parse(&wav_bytes(1, 8_000, 16, 300)).unwrap();

    let resized = original.rewrite(HeaderRewrite::Resize { data_size: 100 });

    assert_eq!(original.as_bytes()[8..40], resized.as_bytes()[8..40]);
}
