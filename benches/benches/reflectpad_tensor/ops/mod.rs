mod padding;

use criterion::criterion_group;

criterion_group!(benches, padding::forward, padding::backward);
