
use bytes::BytesMut;
use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use micro_h1::codec::{FrameDetector, ParseCache, ParseState, RequestDecoder, RequestFramer};
use micro_h1::protocol::Limits;
use tokio_util::codec::Decoder;

const SMALL: &[u8] = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
const POST: &[u8] = b"POST /upload HTTP/1.1\r\nHost: localhost\r\nContent-Type: text/plain\r\nContent-Length: 12\r\n\r\nHello World!";

fn bench_request_decoder(c: &mut Criterion) {
    c.bench_function("decode_simple_request_uncached", |b| {
        let mut decoder = RequestDecoder::uncached(Limits::default());
        b.iter_batched_ref(
            || BytesMut::from(SMALL),
            |bytes| black_box(decoder.decode(bytes).unwrap()),
            BatchSize::SmallInput,
        );
    });

    c.bench_function("decode_simple_request_cached", |b| {
        let mut decoder = RequestDecoder::with_cache(Limits::default(), Arc::new(ParseCache::new()));
        b.iter_batched_ref(
            || BytesMut::from(SMALL),
            |bytes| black_box(decoder.decode(bytes).unwrap()),
            BatchSize::SmallInput,
        );
    });

    c.bench_function("decode_post_request_uncached", |b| {
        let mut decoder = RequestDecoder::uncached(Limits::default());
        b.iter_batched_ref(|| BytesMut::from(POST), |bytes| black_box(decoder.decode(bytes).unwrap()), BatchSize::SmallInput);
    });
}

fn bench_fragmented_detect(c: &mut Criterion) {
    let framer = RequestFramer::new(Limits::default(), None);

    c.bench_function("detect_byte_by_byte", |b| {
        b.iter(|| {
            let mut state = ParseState::new();
            for end in 1..=POST.len() {
                black_box(framer.detect(&POST[..end], &mut state).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_request_decoder, bench_fragmented_detect);
criterion_main!(benches);
