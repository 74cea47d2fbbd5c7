//! Shared sizing for text-bearing native controls

use trellis_core::{Constraints, Size};
use trellis_platform::{NativeBackend, NativeHandle, PlatformError};

/// Size of a control showing `text`: measured content plus `padding`,
/// clamped to `constraints`.
///
/// Tight constraints leave nothing to decide, so the backend is not asked.
pub(crate) fn intrinsic_size(
    backend: &dyn NativeBackend,
    handle: NativeHandle,
    text: &str,
    padding: Size,
    constraints: Constraints,
) -> Result<Size, PlatformError> {
    if constraints.is_tight() {
        return Ok(constraints.min_size());
    }
    let content = backend.measure(handle, text)?;
    Ok(constraints.clamp(Size::new(
        content.width.saturating_add(padding.width),
        content.height.saturating_add(padding.height),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_platform::{BackendCall, ControlKind, HeadlessBackend};

    #[test]
    fn test_measure_plus_padding() {
        let mut probe = HeadlessBackend::new(Size::new(300, 200));
        let handle = probe.create_control(ControlKind::Label, "abc").unwrap();
        probe.set_text_size("abc", Size::new(30, 12));

        let size = intrinsic_size(
            &probe,
            handle,
            "abc",
            Size::new(10, 4),
            Constraints::new(0, 0, 300, 200),
        )
        .unwrap();
        assert_eq!(size, Size::new(40, 16));

        let clamped = intrinsic_size(
            &probe,
            handle,
            "abc",
            Size::new(10, 4),
            Constraints::new(0, 20, 35, 200),
        )
        .unwrap();
        assert_eq!(clamped, Size::new(35, 20));
    }

    #[test]
    fn test_tight_constraints_skip_measure() {
        let mut probe = HeadlessBackend::new(Size::new(300, 200));
        let handle = probe.create_control(ControlKind::Label, "abc").unwrap();
        probe.clear_calls();

        let size = intrinsic_size(
            &probe,
            handle,
            "abc",
            Size::ZERO,
            Constraints::tight(Size::new(7, 9)),
        )
        .unwrap();
        assert_eq!(size, Size::new(7, 9));
        assert!(!probe.calls().contains(&BackendCall::Measure(handle)));
    }
}
