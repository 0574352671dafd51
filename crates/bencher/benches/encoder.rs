use std::hint::black_box;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_evhttp::protocol::Response;

const BODY_SIZES: [usize; 3] = [16, 1024, 16 * 1024];
const CHUNK_SIZE: usize = 1024;

fn benchmark_fixed_length(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("response_fixed_length");

    for size in BODY_SIZES {
        let body = vec![b'x'; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &body, |b, body| {
            b.iter_batched(
                Response::new,
                |mut response| {
                    response.set_header("Server", Some("micro-evhttp")).expect("header is not sent yet");
                    let written = response
                        .send(200u16, Some("text/plain"), &body[..])
                        .expect("body fits the declared length");
                    black_box((written, response.take_outbound()));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_chunked(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("response_chunked");

    for size in BODY_SIZES {
        let body = vec![b'x'; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &body, |b, body| {
            b.iter_batched(
                Response::new,
                |mut response| {
                    response.set_content(Some("text/plain"), 0).expect("header is not sent yet");
                    for chunk in body.chunks(CHUNK_SIZE) {
                        response.send_chunk(chunk).expect("response is chunked");
                    }
                    response.send_chunk(&b""[..]).expect("response is chunked");
                    black_box(response.take_outbound());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(encoder, benchmark_fixed_length, benchmark_chunked);
criterion_main!(encoder);
