use criterion::{black_box, Criterion};
use reflectpad_core::{
    be::ops::padding::pad3d_with_reflection_backward, buffer::Buffer, config::Accumulation, device::Device, dtype::DType,
    pad::PadSpec,
};
use reflectpad_tensor::Tensor;

// Constants for benchmark data sizes
const SIZES: [([usize; 5], &str); 3] = [
    ([1, 4, 8, 16, 16], "small"),
    ([2, 8, 16, 32, 32], "medium"),
    ([2, 16, 32, 64, 64], "large"),
];
const PAD: [usize; 6] = [3, 3, 2, 2, 1, 1];
const DEVICE: Device = Device::Pool(0);

fn setup_group<'a>(criterion: &'a mut Criterion, name: &str) -> criterion::BenchmarkGroup<'a, criterion::measurement::WallTime> {
    let mut group = criterion.benchmark_group(name);
    group.warm_up_time(core::time::Duration::from_millis(500));
    group.measurement_time(core::time::Duration::from_secs(3));
    group.sample_size(50);
    group
}

pub fn forward(criterion: &mut Criterion) {
    let mut group = setup_group(criterion, "padding/forward");

    for dtype in [DType::F32, DType::BF16] {
        for &(shape, size_name) in &SIZES {
            let x = Tensor::randn_with_spec(&shape, DEVICE, dtype).unwrap();
            let bench_name = format!("reflection_pad3d/{}/{}", dtype.as_str(), size_name);

            group.bench_function(&bench_name, |b| b.iter(|| black_box(x.pad_with_reflection3d(&PAD)).unwrap()));
        }
    }

    group.finish();
}

pub fn backward(criterion: &mut Criterion) {
    let mut group = setup_group(criterion, "padding/backward");
    let pad = PadSpec::new(PAD);

    for accumulation in [Accumulation::Atomic, Accumulation::Partitioned] {
        for &(shape, size_name) in &SIZES {
            let output_shape = pad.output_shape(&shape).unwrap();
            let out_len: usize = output_shape.iter().product();
            let in_len: usize = shape.iter().product();
            let grad_output = Buffer::from_vec((0..out_len).map(|i| (i % 10) as f32 / 10.0).collect(), DEVICE);
            let bench_name = format!("reflection_pad3d_backward/{}/{}", accumulation.as_str(), size_name);

            group.bench_function(&bench_name, |b| {
                b.iter(|| {
                    let mut grad_input = Buffer::zeros(in_len, DEVICE, DType::F32);
                    pad3d_with_reflection_backward(&mut grad_input, &grad_output, &output_shape, &shape, &pad, accumulation).unwrap();
                    black_box(grad_input)
                })
            });
        }
    }

    group.finish();
}
