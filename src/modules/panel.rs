use log::warn;

use crate::modules::devices::{self, CUSTOM_DEVICE};

/// One size input of the panel form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeInput {
    pub value: String,
    pub disabled: bool,
    pub required: bool,
}

impl SizeInput {
    fn locked(value: String) -> Self {
        Self {
            value,
            disabled: true,
            required: false,
        }
    }

    fn manual() -> Self {
        Self {
            value: String::new(),
            disabled: false,
            required: true,
        }
    }
}

/// Events the panel form reacts to, routed by origin field.
#[derive(Debug, Clone)]
pub enum PanelEvent {
    BrowserChanged(String),
    DeviceChanged(String),
    BreakpointChanged(String),
    /// A change from any other field; unrecognized origins are logged,
    /// never rejected.
    FieldChanged { name: String, value: String },
    Submit,
    Reset,
}

/// What the controller asks its transport to do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    None,
    /// POST the payload to the start-session endpoint.
    StartSession(Vec<(String, String)>),
    /// GET the stop-session endpoint instead of a form-native reset.
    StopSession,
}

/// State of the browser-panel form.
///
/// The rendition of the panel's DOM state as an explicit struct: field
/// lookups the page does by element id are fields here, and the change /
/// submit / reset callbacks become [`PanelForm::dispatch`].
#[derive(Debug, Clone)]
pub struct PanelForm {
    pub browser: String,
    pub device: String,
    pub breakpoint: String,
    pub height: SizeInput,
    pub width: SizeInput,
    pub url: String,
}

impl Default for PanelForm {
    fn default() -> Self {
        Self {
            browser: "chrome".to_string(),
            device: String::new(),
            breakpoint: String::new(),
            height: SizeInput::locked(String::new()),
            width: SizeInput::locked(String::new()),
            url: String::new(),
        }
    }
}

impl PanelForm {
    /// Route one event to its handler and report the resulting transport
    /// action.
    pub fn dispatch(&mut self, event: PanelEvent) -> PanelAction {
        match event {
            PanelEvent::BrowserChanged(name) => {
                self.browser = name;
                PanelAction::None
            }
            PanelEvent::DeviceChanged(name) => {
                self.select_device(&name);
                PanelAction::None
            }
            PanelEvent::BreakpointChanged(name) => {
                self.select_breakpoint(&name);
                PanelAction::None
            }
            PanelEvent::FieldChanged { name, value } => {
                match name.as_str() {
                    "height" => self.height.value = value,
                    "width" => self.width.value = value,
                    "url" => self.url = value,
                    other => warn!("Change event from unhandled field '{other}'."),
                }
                PanelAction::None
            }
            PanelEvent::Submit => PanelAction::StartSession(self.payload()),
            PanelEvent::Reset => PanelAction::StopSession,
        }
    }

    /// Devices and breakpoints are mutually exclusive; picking a device
    /// clears the breakpoint and sizes the inputs from the preset. The
    /// `custom` entry unlocks the inputs for manual entry instead.
    fn select_device(&mut self, name: &str) {
        self.breakpoint.clear();

        if name == CUSTOM_DEVICE {
            self.device = name.to_string();
            self.height = SizeInput::manual();
            self.width = SizeInput::manual();
            return;
        }

        match devices::device(name) {
            Some(preset) => {
                self.device = name.to_string();
                self.height = SizeInput::locked(preset.height.to_string());
                self.width = SizeInput::locked(preset.width.to_string());
            }
            None => {
                if !name.is_empty() {
                    warn!("Unknown device '{name}' provided.");
                }
                self.device.clear();
                self.height = SizeInput::locked(String::new());
                self.width = SizeInput::locked(String::new());
            }
        }
    }

    /// Picking a breakpoint clears any device selection, `custom` included,
    /// and locks the emptied size inputs again. The latest interaction
    /// always wins.
    fn select_breakpoint(&mut self, name: &str) {
        self.device.clear();
        self.breakpoint = name.to_string();
        self.height = SizeInput::locked(String::new());
        self.width = SizeInput::locked(String::new());
    }

    /// The form payload at submit time.
    ///
    /// A native form submission skips disabled inputs, so the page appends
    /// the current height/width values whenever the size inputs are locked;
    /// with the `custom` device they are enabled and ride along on their
    /// own. Either way the payload carries exactly one height and one width
    /// pair, which is what this models.
    pub fn payload(&self) -> Vec<(String, String)> {
        vec![
            ("browser".to_string(), self.browser.clone()),
            ("device".to_string(), self.device.clone()),
            ("breakpoint".to_string(), self.breakpoint.clone()),
            ("url".to_string(), self.url.clone()),
            ("height".to_string(), self.height.value.clone()),
            ("width".to_string(), self.width.value.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(pairs: &'a [(String, String)], name: &str) -> &'a str {
        &pairs
            .iter()
            .find(|(key, _)| key == name)
            .unwrap_or_else(|| panic!("payload missing '{name}'"))
            .1
    }

    #[test]
    fn device_preset_locks_inputs_to_its_viewport() {
        let mut form = PanelForm::default();
        form.dispatch(PanelEvent::DeviceChanged("iPad Mini".to_string()));

        assert_eq!(form.height, SizeInput::locked("1024".to_string()));
        assert_eq!(form.width, SizeInput::locked("768".to_string()));
        assert!(!form.height.required);
    }

    #[test]
    fn custom_device_enables_and_requires_inputs() {
        let mut form = PanelForm::default();
        form.dispatch(PanelEvent::DeviceChanged(CUSTOM_DEVICE.to_string()));

        assert!(!form.height.disabled);
        assert!(form.height.required);
        assert!(!form.width.disabled);
        assert!(form.width.required);
    }

    #[test]
    fn breakpoint_clears_a_selected_device() {
        let mut form = PanelForm::default();
        form.dispatch(PanelEvent::DeviceChanged("Galaxy S8".to_string()));
        form.dispatch(PanelEvent::BreakpointChanged("tablet".to_string()));

        assert_eq!(form.device, "");
        assert_eq!(form.breakpoint, "tablet");
        assert!(form.height.disabled);
        assert_eq!(form.height.value, "");
        assert!(form.width.disabled);
        assert_eq!(form.width.value, "");
    }

    #[test]
    fn breakpoint_also_clears_a_custom_device() {
        // Latest interaction wins: custom is no more sticky than a preset.
        let mut form = PanelForm::default();
        form.dispatch(PanelEvent::DeviceChanged(CUSTOM_DEVICE.to_string()));
        form.dispatch(PanelEvent::BreakpointChanged("mobile".to_string()));

        assert_eq!(form.device, "");
        assert!(form.height.disabled);
        assert!(!form.height.required);
    }

    #[test]
    fn device_clears_a_selected_breakpoint() {
        let mut form = PanelForm::default();
        form.dispatch(PanelEvent::BreakpointChanged("laptop".to_string()));
        form.dispatch(PanelEvent::DeviceChanged("Nest Hub".to_string()));

        assert_eq!(form.breakpoint, "");
        assert_eq!(form.width.value, "1024");
    }

    #[test]
    fn unrecognized_field_is_ignored_not_rejected() {
        let mut form = PanelForm::default();
        let before = form.payload();
        let action = form.dispatch(PanelEvent::FieldChanged {
            name: "theme".to_string(),
            value: "dark".to_string(),
        });

        assert_eq!(action, PanelAction::None);
        assert_eq!(form.payload(), before);
    }

    #[test]
    fn submit_with_custom_sizes_carries_them_exactly() {
        let mut form = PanelForm::default();
        form.dispatch(PanelEvent::DeviceChanged(CUSTOM_DEVICE.to_string()));
        form.dispatch(PanelEvent::FieldChanged {
            name: "height".to_string(),
            value: "800".to_string(),
        });
        form.dispatch(PanelEvent::FieldChanged {
            name: "width".to_string(),
            value: "600".to_string(),
        });

        let PanelAction::StartSession(pairs) = form.dispatch(PanelEvent::Submit) else {
            panic!("submit must start a session");
        };
        assert_eq!(value(&pairs, "device"), CUSTOM_DEVICE);
        assert_eq!(value(&pairs, "height"), "800");
        assert_eq!(value(&pairs, "width"), "600");
    }

    #[test]
    fn submit_appends_preset_sizes_for_locked_inputs() {
        let mut form = PanelForm::default();
        form.dispatch(PanelEvent::DeviceChanged("Surface Duo".to_string()));

        let PanelAction::StartSession(pairs) = form.dispatch(PanelEvent::Submit) else {
            panic!("submit must start a session");
        };
        assert_eq!(value(&pairs, "height"), "720");
        assert_eq!(value(&pairs, "width"), "540");
        assert_eq!(pairs.iter().filter(|(key, _)| key == "height").count(), 1);
    }

    #[test]
    fn reset_stops_the_session_instead_of_clearing_the_form() {
        let mut form = PanelForm::default();
        form.dispatch(PanelEvent::DeviceChanged("iPhone XR".to_string()));

        assert_eq!(form.dispatch(PanelEvent::Reset), PanelAction::StopSession);
        // The form keeps its state; only the session is asked to stop.
        assert_eq!(form.device, "iPhone XR");
    }
}
