use reflectpad::prelude::*;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    set_default_device(Device::Pool(0));

    let mut x = Tensor::new((1..=4).map(|v| v as f32).collect::<Vec<_>>())?;
    x.with_shape(&[1, 1, 1, 4])?;
    x.with_grad()?;

    let layer = ReflectionPad3d::new(&[2, 2, 0, 0, 0, 0])?;
    let y = layer.forward(&x)?;
    println!("forward: {:?} -> {:?}", x.to_flatten_vec::<f32>()?, y.to_flatten_vec::<f32>()?);

    y.backward()?;
    if let Some(grad) = x.grad()? {
        println!("grad:    {:?}", grad.to_flatten_vec::<f32>()?);
    }

    let sizes = [8, 32, 64];
    let iterations = 10;
    for &size in &sizes {
        benchmark_pad(size, iterations)?;
    }

    Ok(())
}

fn benchmark_pad(size: usize, iterations: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut x = Tensor::randn(&[2, 4, size, size, size])?;
    x.with_grad()?;

    let mut times = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let start = Instant::now();
        let y = x.pad_with_reflection3d(&[3; 6])?;
        y.backward()?;
        times.push(start.elapsed());
    }

    let avg = times.iter().sum::<std::time::Duration>() / iterations as u32;
    let min = times.iter().min().copied().unwrap_or_default();
    let max = times.iter().max().copied().unwrap_or_default();
    println!("[2, 4, {0}, {0}, {0}] forward+backward - Avg: {1:?}, Min: {2:?}, Max: {3:?}", size, avg, min, max);

    Ok(())
}
