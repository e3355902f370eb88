use ndarray::ArrayView1;

/// Index and value of the largest element. The first maximum wins ties and
/// NaN never wins. Returns `None` for an empty or all-NaN vector.
pub(crate) fn argmax(values: ArrayView1<'_, f32>) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best
}
