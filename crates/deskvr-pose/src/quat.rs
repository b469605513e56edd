use crate::DeviceKind;
use glam::DQuat;

/// Accumulated Euler-style angles of a device, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerAngles {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl EulerAngles {
    pub const ZERO: Self = Self {
        yaw: 0.0,
        pitch: 0.0,
        roll: 0.0,
    };
}

/// Cosine and sine of half an angle.
#[derive(Clone, Copy)]
struct Half {
    c: f64,
    s: f64,
}

impl Half {
    fn of(angle: f64) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Self { c, s }
    }
}

/// Orientation of a device from its accumulators.
///
/// Built in closed form from half-angle terms, so the result is unit length without
/// renormalization.
pub fn orientation(kind: DeviceKind, angles: EulerAngles) -> DQuat {
    match kind {
        DeviceKind::Head => head_orientation(angles),
        DeviceKind::Hand(_) => hand_orientation(angles),
    }
}

/// Head terms, expanded yaw first, then roll, then pitch.
fn head_orientation(angles: EulerAngles) -> DQuat {
    let y = Half::of(angles.yaw);
    let r = Half::of(angles.roll);
    let p = Half::of(angles.pitch);

    DQuat::from_xyzw(
        y.c * r.s * p.c - y.s * r.c * p.s,
        y.c * r.c * p.s + y.s * r.s * p.c,
        y.s * r.c * p.c - y.c * r.s * p.s,
        y.c * r.c * p.c + y.s * r.s * p.s,
    )
}

/// Hand terms, expanded roll first, then pitch, then yaw.
fn hand_orientation(angles: EulerAngles) -> DQuat {
    let r = Half::of(angles.roll);
    let p = Half::of(angles.pitch);
    let y = Half::of(angles.yaw);

    DQuat::from_xyzw(
        r.s * p.c * y.c - r.c * p.s * y.s,
        r.c * p.s * y.c + r.s * p.c * y.s,
        -r.s * p.s * y.c + r.c * p.c * y.s,
        r.c * p.c * y.c + r.s * p.s * y.s,
    )
}
