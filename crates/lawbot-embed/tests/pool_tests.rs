use candle_core::{DType, Device, Tensor};
use lawbot_embed::masked_mean_l2;

fn close(a: &[f32], b: &[f32]) -> bool { a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5) }

#[test]
fn padding_positions_do_not_move_the_mean() {
    let dev = Device::Cpu;
    // Row 0 keeps both tokens, row 1 keeps only the first.
    let h = Tensor::from_slice(
        &[3.0f32, 0.0, 0.0, 5.0, 0.0, 0.0, /* row 1 */ 0.0, 2.0, 0.0, 9.0, 9.0, 9.0],
        (2, 2, 3),
        &dev,
    )
    .unwrap();
    let mask = Tensor::from_slice(&[1u32, 1, 1, 0], (2, 2), &dev).unwrap();

    let rows: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).unwrap().to_vec2().unwrap();
    assert!(close(&rows[0], &[1.0, 0.0, 0.0]), "{:?}", rows[0]);
    assert!(close(&rows[1], &[0.0, 1.0, 0.0]), "{:?}", rows[1]);
}

#[test]
fn rows_are_unit_length() {
    let dev = Device::Cpu;
    let h = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0], (1, 1, 4), &dev).unwrap();
    let mask = Tensor::ones((1, 1), DType::F32, &dev).unwrap();
    let v: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).unwrap().to_vec2().unwrap();
    let norm = v[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[test]
fn fully_masked_row_is_zero_not_nan() {
    let dev = Device::Cpu;
    let h = Tensor::ones((1, 2, 3), DType::F32, &dev).unwrap();
    let mask = Tensor::zeros((1, 2), DType::F32, &dev).unwrap();
    let v: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).unwrap().to_vec2().unwrap();
    assert!(v[0].iter().all(|x| *x == 0.0));
}

#[test]
fn rank_two_input_is_an_error() {
    let dev = Device::Cpu;
    let h = Tensor::zeros((2, 4), DType::F32, &dev).unwrap();
    let mask = Tensor::ones((2, 1), DType::F32, &dev).unwrap();
    assert!(masked_mean_l2(&h, &mask).is_err());
}
