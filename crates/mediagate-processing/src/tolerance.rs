/// True when `a` and `b` differ by at most `tolerance`, in absolute terms.
///
/// The bound does not scale with magnitude: 0.2 s is as strict for a two hour film
/// as for a two second clip. NaN on either side never passes.
pub fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}
