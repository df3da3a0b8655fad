use fdm_wave::stencil::{leapfrog_step, Coefficients};
use fdm_wave::Shape;

fn main() {
    let u = vec![1., 2., 3., 4., 4., 3., 2., 1., 1., 2., 3., 4.];
    let v = vec![3., 2., 1., 4., 4., 1., 2., 3., 3., 2., 1., 4.];
    let mut w = vec![0.; 12];

    let dt = 1.;
    let dx = 2.;
    let speed = 1.;
    let gamma = 0.;

    leapfrog_step(
        &u,
        &v,
        &mut w,
        Shape { ny: 3, nx: 4 },
        Coefficients::new(speed, gamma, dt, dx),
    );

    println!("{:?}", w);
}
