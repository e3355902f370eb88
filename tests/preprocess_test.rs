mod common;

use hijaiyah::classifier::{count_distinct_values, is_blank, preprocess, INPUT_SHAPE};
use hijaiyah::{Canvas, CanvasSettings, ClassifierError, Drawing};
use ndarray::Array3;

#[test]
fn test_output_shape_and_range_for_various_sizes() -> Result<(), ClassifierError> {
    common::init();
    for (height, width) in [(300, 400), (150, 150), (1, 1), (37, 512), (900, 90)] {
        let buffer = Array3::from_shape_fn((height, width, 4), |(y, x, c)| {
            ((y * 7 + x * 13 + c * 31) % 256) as u8
        });
        let tensor = preprocess(buffer.view())?;
        assert_eq!(tensor.shape(), &INPUT_SHAPE);
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
    Ok(())
}

#[test]
fn test_preprocessing_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let settings = CanvasSettings::default();
    let drawing: Drawing = serde_json::from_str(
        "[[[200, 40], [200, 260]], [[120, 260], [280, 260], [300, 230]]]",
    )?;
    let mut canvas = Canvas::new(&settings);
    canvas.draw(&drawing, &settings);
    let buffer = canvas.pixels();

    let first = preprocess(buffer.view())?;
    let second = preprocess(buffer.clone().view())?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_uniform_white_maps_to_ones() -> Result<(), ClassifierError> {
    let tensor = preprocess(common::uniform_buffer(255).view())?;
    assert!(tensor.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    Ok(())
}

#[test]
fn test_wrong_channel_count_is_input_format_error() {
    let gray = Array3::<u8>::zeros((300, 400, 1));
    let err = preprocess(gray.view()).unwrap_err();
    assert!(matches!(err, ClassifierError::InputFormat(_)));
}

#[test]
fn test_fresh_canvas_is_blank() {
    let canvas = Canvas::new(&CanvasSettings::default());
    let pixels = canvas.pixels();
    assert_eq!(count_distinct_values(pixels.view()), 1);
    assert!(is_blank(pixels.view()));
    assert!(is_blank(common::uniform_buffer(255).view()));
}

#[test]
fn test_drawn_canvas_is_not_blank() {
    let settings = CanvasSettings::default();
    let mut canvas = Canvas::new(&settings);
    canvas.stroke(&[[100.0, 100.0], [300.0, 200.0]], &settings);
    assert!(!is_blank(canvas.pixels().view()));
    assert!(!is_blank(common::drawn_buffer().view()));
}

#[test]
fn test_two_value_drawing_is_treated_as_blank() {
    // a hard-edged black square on white only contains 0 and 255
    let buffer = Array3::from_shape_fn((300, 400, 4), |(y, x, c)| {
        if c < 3 && (100..200).contains(&y) && (150..250).contains(&x) {
            0
        } else {
            255
        }
    });
    assert_eq!(count_distinct_values(buffer.view()), 2);
    assert!(is_blank(buffer.view()));
}
