//! Pointer gestures as an explicit state machine
//!
//! Each gesture goes `Idle -> Moving | Resizing | Rotating -> Idle`. The
//! reference frame (pointer, box and container size at pointer-down) is
//! captured once when the gesture starts; later pointer events are measured
//! against it, never against live layout.

use crate::layout::{ContainerSize, Overlay, Point};
use crate::types::OverlayId;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Dragging the box body
    Moving {
        overlay: OverlayId,
        start_pointer: Point,
        start_x: f32,
        start_y: f32,
        container: ContainerSize,
    },
    /// Dragging the aspect-locked corner handle
    Resizing {
        overlay: OverlayId,
        start_pointer: Point,
        start_width: f32,
        container: ContainerSize,
    },
    /// Dragging the rotation handle around the box center
    Rotating { overlay: OverlayId, center: Point },
}

impl Gesture {
    pub fn begin_move(overlay: &Overlay, pointer: Point, container: ContainerSize) -> Self {
        Gesture::Moving {
            overlay: overlay.id,
            start_pointer: pointer,
            start_x: overlay.x,
            start_y: overlay.y,
            container,
        }
    }

    pub fn begin_resize(overlay: &Overlay, pointer: Point, container: ContainerSize) -> Self {
        Gesture::Resizing {
            overlay: overlay.id,
            start_pointer: pointer,
            start_width: overlay.width,
            container,
        }
    }

    /// `center` is the box's on-screen center, taken from layout at
    /// pointer-down so it stays correct under any parent transform.
    pub fn begin_rotate(overlay: &Overlay, center: Point) -> Self {
        Gesture::Rotating {
            overlay: overlay.id,
            center,
        }
    }

    /// Overlay this gesture is acting on
    pub fn overlay(&self) -> Option<OverlayId> {
        match self {
            Gesture::Idle => None,
            Gesture::Moving { overlay, .. }
            | Gesture::Resizing { overlay, .. }
            | Gesture::Rotating { overlay, .. } => Some(*overlay),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }

    /// Apply a pointer position to the overlay.
    ///
    /// Returns `false` when idle, when `overlay` is not the gesture's target,
    /// or when the captured container has no usable size.
    pub fn apply(&self, overlay: &mut Overlay, pointer: Point) -> bool {
        if self.overlay() != Some(overlay.id) {
            return false;
        }

        match *self {
            Gesture::Idle => return false,
            Gesture::Moving { container, .. } | Gesture::Resizing { container, .. }
                if !container.is_usable() =>
            {
                return false;
            }
            Gesture::Moving {
                start_pointer,
                start_x,
                start_y,
                container,
                ..
            } => {
                let dx = (pointer.x - start_pointer.x) / container.width * 100.0;
                let dy = (pointer.y - start_pointer.y) / container.height * 100.0;
                overlay.move_to(start_x + dx, start_y + dy);
            }
            Gesture::Resizing {
                start_pointer,
                start_width,
                container,
                ..
            } => {
                let dw = (pointer.x - start_pointer.x) / container.width * 100.0;
                overlay.resize_to(start_width + dw, container.ratio());
            }
            Gesture::Rotating { center, .. } => {
                overlay.rotate_towards(pointer, center);
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> Overlay {
        Overlay {
            id: OverlayId(3),
            page: 0,
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 20.0,
            rotation: 0.0,
            image_aspect: 1.0,
        }
    }

    #[test]
    fn test_move_measures_from_gesture_start() {
        let mut target = overlay();
        let container = ContainerSize::new(400.0, 400.0);
        let gesture = Gesture::begin_move(&target, Point::new(100.0, 100.0), container);

        assert!(gesture.apply(&mut target, Point::new(140.0, 100.0)));
        assert!((target.x - 20.0).abs() < 1e-4);

        // Second event is still relative to pointer-down, not the last event
        assert!(gesture.apply(&mut target, Point::new(180.0, 120.0)));
        assert!((target.x - 30.0).abs() < 1e-4);
        assert!((target.y - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize_uses_start_container_ratio() {
        let mut target = overlay();
        let container = ContainerSize::new(300.0, 600.0);
        let gesture = Gesture::begin_resize(&target, Point::new(0.0, 0.0), container);

        gesture.apply(&mut target, Point::new(30.0, 0.0));
        assert!((target.width - 30.0).abs() < 1e-4);
        assert!((target.height - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_faces_pointer() {
        let mut target = overlay();
        let gesture = Gesture::begin_rotate(&target, Point::new(50.0, 50.0));

        gesture.apply(&mut target, Point::new(100.0, 50.0));
        assert!((target.rotation - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_other_overlay_untouched() {
        let source = overlay();
        let mut other = overlay();
        other.id = OverlayId(4);

        let gesture = Gesture::begin_move(&source, Point::default(), ContainerSize::new(10.0, 10.0));
        assert!(!gesture.apply(&mut other, Point::new(5.0, 5.0)));
        assert_eq!(other.x, 10.0);

        assert!(!Gesture::Idle.apply(&mut other, Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_empty_container_leaves_overlay_alone() {
        let mut target = overlay();
        let before = target.clone();

        for container in [
            ContainerSize::new(0.0, 0.0),
            ContainerSize::new(400.0, 0.0),
            ContainerSize::new(f32::NAN, 400.0),
        ] {
            let moving = Gesture::begin_move(&target, Point::default(), container);
            assert!(!moving.apply(&mut target, Point::new(40.0, 40.0)));

            let resizing = Gesture::begin_resize(&target, Point::default(), container);
            assert!(!resizing.apply(&mut target, Point::new(40.0, 40.0)));
        }

        assert_eq!(target, before);
    }
}
