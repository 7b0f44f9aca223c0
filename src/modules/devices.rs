use serde::Serialize;

/// A named device viewport preset.
#[derive(Debug, Clone, Serialize)]
pub struct DevicePreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// A fixed-width viewport breakpoint, mutually exclusive with device presets.
#[derive(Debug, Clone, Serialize)]
pub struct Breakpoint {
    pub name: &'static str,
    pub width: u32,
}

/// Device entry that unlocks the manual height/width inputs.
pub const CUSTOM_DEVICE: &str = "custom";

pub const DEVICES: &[DevicePreset] = &[
    DevicePreset { name: "Galaxy S8", width: 360, height: 740 },
    DevicePreset { name: "Galaxy S20", width: 412, height: 915 },
    DevicePreset { name: "Galaxy Fold", width: 280, height: 653 },
    DevicePreset { name: "iPad Mini", width: 768, height: 1024 },
    DevicePreset { name: "iPad Air", width: 820, height: 1180 },
    DevicePreset { name: "iPad Pro", width: 1024, height: 1366 },
    DevicePreset { name: "iPhone SE", width: 375, height: 667 },
    DevicePreset { name: "iPhone XR", width: 414, height: 896 },
    DevicePreset { name: "Nest Hub", width: 1024, height: 600 },
    DevicePreset { name: "Nest Hub Max", width: 1280, height: 800 },
    DevicePreset { name: "Surface Duo", width: 540, height: 720 },
    DevicePreset { name: "Surface Pro", width: 912, height: 1368 },
];

pub const BREAKPOINTS: &[Breakpoint] = &[
    Breakpoint { name: "mobile", width: 480 },
    Breakpoint { name: "tablet", width: 768 },
    Breakpoint { name: "laptop", width: 1024 },
    Breakpoint { name: "desktop", width: 1536 },
];

pub fn device(name: &str) -> Option<&'static DevicePreset> {
    DEVICES.iter().find(|preset| preset.name == name)
}

pub fn breakpoint(name: &str) -> Option<&'static Breakpoint> {
    BREAKPOINTS.iter().find(|bp| bp.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_device_resolves_with_its_viewport() {
        let preset = device("iPhone SE").unwrap();
        assert_eq!(preset.width, 375);
        assert_eq!(preset.height, 667);
    }

    #[test]
    fn custom_is_not_a_preset() {
        assert!(device(CUSTOM_DEVICE).is_none());
    }

    #[test]
    fn breakpoints_are_the_four_fixed_widths() {
        let widths: Vec<u32> = BREAKPOINTS.iter().map(|bp| bp.width).collect();
        assert_eq!(widths, vec![480, 768, 1024, 1536]);
        assert_eq!(breakpoint("tablet").unwrap().width, 768);
        assert!(breakpoint("widescreen").is_none());
    }
}
