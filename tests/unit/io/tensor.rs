use super::*;
use crate::foundation::core::Rgba8;
use crate::foundation::error::OverlayError;

#[test]
fn new_validates_shape() {
    assert!(ImageTensor::new(&[2, 2], vec![0.0; 4]).is_err());
    assert!(ImageTensor::new(&[1, 1, 2], vec![0.0; 2]).is_err());
    assert!(ImageTensor::new(&[1, 1, 3], vec![0.0; 4]).is_err());
    assert!(ImageTensor::new(&[1, 1, 1, 1, 3], vec![0.0; 3]).is_err());

    let t = ImageTensor::new(&[2, 1, 1, 4], vec![0.0; 8]).unwrap();
    assert!(t.is_batched());
    assert_eq!(t.len(), 2);
    assert_eq!(t.shape(), vec![2, 1, 1, 4]);
}

#[test]
fn rgb_values_clamp_and_truncate() {
    let t = ImageTensor::new(&[1, 2, 3], vec![1.5, 0.5, -1.0, 0.999, f32::NAN, 0.0]).unwrap();
    let canvases = t.to_canvases().unwrap();
    assert_eq!(canvases.len(), 1);
    assert_eq!(canvases[0].pixel(0, 0), Some(Rgba8::new(255, 127, 0, 255)));
    assert_eq!(canvases[0].pixel(1, 0), Some(Rgba8::new(254, 0, 0, 255)));
}

#[test]
fn rgba_alpha_is_kept() {
    let t = ImageTensor::new(&[1, 1, 1, 4], vec![0.0, 0.0, 1.0, 0.5]).unwrap();
    let canvases = t.to_canvases().unwrap();
    assert_eq!(canvases[0].pixel(0, 0), Some(Rgba8::new(0, 0, 255, 127)));
}

#[test]
fn from_canvases_keeps_layout_and_channels() {
    let canvases = vec![
        Canvas::filled(2, 1, Rgba8::new(255, 0, 51, 255)),
        Canvas::filled(2, 1, Rgba8::new(0, 255, 0, 255)),
    ];
    let t = ImageTensor::from_canvases(&canvases, 3, true).unwrap();
    assert_eq!(t.shape(), vec![2, 1, 2, 3]);
    assert_eq!(&t.data()[..3], &[1.0, 0.0, 0.2]);
    assert_eq!(&t.data()[6..9], &[0.0, 1.0, 0.0]);

    let single = ImageTensor::from_canvases(&canvases[..1], 4, false).unwrap();
    assert_eq!(single.shape(), vec![1, 2, 4]);
    assert_eq!(single.data()[3], 1.0);
}

#[test]
fn from_canvases_rejects_bad_batches() {
    let a = Canvas::transparent(2, 2);
    let b = Canvas::transparent(3, 2);
    assert!(ImageTensor::from_canvases(&[a.clone(), b], 4, true).is_err());
    assert!(ImageTensor::from_canvases(&[a.clone(), a], 4, false).is_err());
    assert!(ImageTensor::from_canvases(&[], 4, false).is_err());
}

#[test]
fn empty_batch_converts_to_no_canvases() {
    let t = ImageTensor::new(&[0, 4, 4, 3], Vec::new()).unwrap();
    assert!(t.is_empty());
    assert!(t.to_canvases().unwrap().is_empty());
}

#[test]
fn empty_batch_with_oversized_images_is_rejected() {
    let side = u32::MAX as usize;
    let err = ImageTensor::new(&[0, side, side, 4], Vec::new()).unwrap_err();
    assert!(matches!(err, OverlayError::Validation(_)));
    assert!(ImageTensor::new(&[usize::MAX, 2, 1, 3], Vec::new()).is_err());
}
