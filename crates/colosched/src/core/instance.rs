/// Single instance of an app, either placed on some machine or unplaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    id: String,
    app_id: String,
    machine_id: Option<String>,
}

impl Instance {
    pub fn new(id: &str, app_id: &str, machine_id: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            app_id: app_id.to_string(),
            machine_id: machine_id.map(str::to_string),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the machine hosting the instance. Invalid residents keep their origin machine until relocated.
    pub fn machine_id(&self) -> Option<&str> {
        self.machine_id.as_deref()
    }

    pub(crate) fn set_machine(&mut self, machine_id: &str) {
        self.machine_id = Some(machine_id.to_string());
    }
}
