use criterion::{Criterion, black_box, criterion_group, criterion_main};
use stereo_math::{
    Degrees, Matrix4, RegisterKernel, ScalarKernel,
    projection::projection,
    stereo::mv_mvp_inverse_projection_00_with,
    transform::{rotate_x, rotate_y, scale, translate},
};

fn model_view() -> Matrix4 {
    rotate_y(Degrees(35.0))
        * rotate_x(Degrees(-20.0))
        * scale(1.5, 1.5, 1.5)
        * translate(2.0, -1.0, 12.0)
}

pub fn bench_general_inverse(c: &mut Criterion) {
    let m = model_view();
    c.bench_function("general_inverse", |b| {
        b.iter(|| black_box(&m).inverted().unwrap())
    });
}

pub fn bench_euclidean_inverse_scalar(c: &mut Criterion) {
    let m = model_view();
    c.bench_function("euclidean_inverse_scalar", |b| {
        b.iter(|| black_box(&m).inverted_euclidean_with(&ScalarKernel).unwrap())
    });
}

pub fn bench_euclidean_inverse_register(c: &mut Criterion) {
    let m = model_view();
    c.bench_function("euclidean_inverse_register", |b| {
        b.iter(|| black_box(&m).inverted_euclidean_with(&RegisterKernel).unwrap())
    });
}

pub fn bench_inverse_projection_00(c: &mut Criterion) {
    let mv = model_view();
    let mvp = mv * projection(0.1, 1000.0, Degrees(90.0), Degrees(60.0)).unwrap();
    c.bench_function("inverse_projection_00_scalar", |b| {
        b.iter(|| {
            mv_mvp_inverse_projection_00_with(&ScalarKernel, black_box(&mv), black_box(&mvp))
                .unwrap()
        })
    });
    c.bench_function("inverse_projection_00_register", |b| {
        b.iter(|| {
            mv_mvp_inverse_projection_00_with(&RegisterKernel, black_box(&mv), black_box(&mvp))
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_general_inverse,
    bench_euclidean_inverse_scalar,
    bench_euclidean_inverse_register,
    bench_inverse_projection_00
);
criterion_main!(benches);
