//! Text input and the create/edit forms.
//!
//! A form turns into a [`Mutation`] only after it validates. A rejected form
//! stays open and nothing reaches the network.

use crate::actions::Mutation;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rediver_core::{
    AdminRole, CreateAdminRequest, CreateBootstrapTokenRequest, CreateTargetMappingRequest,
    MappingId, TargetAssetTypeMapping, UpdateTargetMappingRequest, ValidationError,
};

// ============================================================================
// TEXT INPUT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    masked: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input whose contents render as bullets.
    pub fn masked() -> Self {
        Self {
            value: String::new(),
            masked: true,
        }
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            masked: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Apply an editing key. Returns false for keys the input does not use.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('u') {
                self.clear();
                return true;
            }
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.push(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// FORMS
// ============================================================================

const YES_NO: &[&str] = &["no", "yes"];
const ROLES: &[&str] = &["viewer", "ops_admin", "super_admin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub kind: FieldKind,
    pub input: TextInput,
    choice: usize,
}

impl FormField {
    fn text(label: &'static str, value: &str) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
            input: TextInput::with_value(value),
            choice: 0,
        }
    }

    fn number(label: &'static str, value: &str) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(label, value)
        }
    }

    fn choice(label: &'static str, options: &'static [&'static str], selected: &str) -> Self {
        Self {
            label,
            kind: FieldKind::Choice(options),
            input: TextInput::new(),
            choice: options.iter().position(|o| *o == selected).unwrap_or(0),
        }
    }

    fn flag(label: &'static str, value: bool) -> Self {
        Self::choice(label, YES_NO, if value { "yes" } else { "no" })
    }

    pub fn display(&self) -> String {
        match self.kind {
            FieldKind::Choice(options) => options.get(self.choice).copied().unwrap_or("").to_string(),
            FieldKind::Text | FieldKind::Number => self.input.display(),
        }
    }

    fn text_value(&self) -> String {
        self.input.value().trim().to_string()
    }

    fn optional_text(&self) -> Option<String> {
        Some(self.text_value()).filter(|v| !v.is_empty())
    }

    fn is_yes(&self) -> bool {
        self.display() == "yes"
    }

    fn cycle(&mut self, forward: bool) {
        if let FieldKind::Choice(options) = self.kind {
            let len = options.len();
            self.choice = if forward {
                (self.choice + 1) % len
            } else {
                (self.choice + len - 1) % len
            };
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    CreateToken,
    CreateAdmin,
    CreateMapping,
    EditMapping(MappingId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Continue,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl Form {
    pub fn create_token() -> Self {
        Self::new(
            FormKind::CreateToken,
            vec![
                FormField::text("Description", ""),
                FormField::number(
                    "Max uses",
                    &CreateBootstrapTokenRequest::DEFAULT_MAX_USES.to_string(),
                ),
                FormField::number(
                    "Expires in (hours)",
                    &CreateBootstrapTokenRequest::DEFAULT_EXPIRES_IN_HOURS.to_string(),
                ),
                FormField::text("Allowed regions (comma separated)", ""),
            ],
        )
    }

    pub fn create_admin() -> Self {
        Self::new(
            FormKind::CreateAdmin,
            vec![
                FormField::text("Email", ""),
                FormField::text("Name", ""),
                FormField::choice("Role", ROLES, AdminRole::Viewer.as_str()),
            ],
        )
    }

    pub fn create_mapping() -> Self {
        Self::new(
            FormKind::CreateMapping,
            vec![
                FormField::text("Target type", ""),
                FormField::text("Asset type", ""),
                FormField::number("Priority", ""),
                FormField::flag("Primary", true),
                FormField::text("Description", ""),
            ],
        )
    }

    pub fn edit_mapping(mapping: &TargetAssetTypeMapping) -> Self {
        let priority = mapping.priority.map(|p| p.to_string()).unwrap_or_default();
        Self::new(
            FormKind::EditMapping(mapping.id),
            vec![
                FormField::text("Target type", &mapping.target_type),
                FormField::text("Asset type", &mapping.asset_type),
                FormField::number("Priority", &priority),
                FormField::flag("Primary", mapping.is_primary),
                FormField::text("Description", mapping.description.as_deref().unwrap_or("")),
                FormField::flag("Active", mapping.is_active),
            ],
        )
    }

    fn new(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::CreateToken => "Create bootstrap token",
            FormKind::CreateAdmin => "Create admin",
            FormKind::CreateMapping => "Create target mapping",
            FormKind::EditMapping(_) => "Edit target mapping",
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        match key.code {
            KeyCode::Esc => return FormInput::Cancel,
            KeyCode::Enter => return FormInput::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len();
                return FormInput::Continue;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
                return FormInput::Continue;
            }
            _ => {}
        }

        let Some(field) = self.fields.get_mut(self.focus) else {
            return FormInput::Continue;
        };
        match field.kind {
            FieldKind::Choice(_) => match key.code {
                KeyCode::Left => field.cycle(false),
                KeyCode::Right | KeyCode::Char(' ') => field.cycle(true),
                _ => {}
            },
            FieldKind::Number => {
                let accepts = match key.code {
                    KeyCode::Char(c) => c.is_ascii_digit() || c == '-',
                    _ => true,
                };
                if accepts {
                    field.input.handle_key(key);
                }
            }
            FieldKind::Text => {
                field.input.handle_key(key);
            }
        }
        FormInput::Continue
    }

    fn field(&self, label: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.label == label)
    }

    fn text(&self, label: &str) -> String {
        self.field(label).map(FormField::text_value).unwrap_or_default()
    }

    fn optional_text(&self, label: &str) -> Option<String> {
        self.field(label).and_then(FormField::optional_text)
    }

    fn flag(&self, label: &str) -> bool {
        self.field(label).map(FormField::is_yes).unwrap_or(false)
    }

    /// Validate and build the mutation this form describes.
    pub fn submit(&self) -> Result<Mutation, ValidationError> {
        match self.kind {
            FormKind::CreateToken => {
                let request = CreateBootstrapTokenRequest {
                    description: self.optional_text("Description"),
                    max_uses: parse_count(&self.text("Max uses"), "max_uses", "Max uses")?,
                    expires_in_hours: parse_count(
                        &self.text("Expires in (hours)"),
                        "expires_in_hours",
                        "Expiry",
                    )?,
                    allowed_regions: split_list(&self.text("Allowed regions (comma separated)")),
                };
                request.validate()?;
                Ok(Mutation::CreateToken(request))
            }
            FormKind::CreateAdmin => {
                let role = self
                    .field("Role")
                    .map(FormField::display)
                    .and_then(|r| r.parse::<AdminRole>().ok())
                    .unwrap_or_default();
                let request = CreateAdminRequest {
                    email: self.text("Email"),
                    name: self.text("Name"),
                    role,
                };
                request.validate()?;
                Ok(Mutation::CreateAdmin(request))
            }
            FormKind::CreateMapping => {
                let request = CreateTargetMappingRequest {
                    target_type: self.text("Target type"),
                    asset_type: self.text("Asset type"),
                    priority: parse_priority(&self.text("Priority"))?,
                    is_primary: Some(self.flag("Primary")),
                    is_active: None,
                    description: self.optional_text("Description"),
                };
                request.validate()?;
                Ok(Mutation::CreateMapping(request))
            }
            FormKind::EditMapping(id) => {
                let body = UpdateTargetMappingRequest {
                    target_type: Some(self.text("Target type")),
                    asset_type: Some(self.text("Asset type")),
                    priority: parse_priority(&self.text("Priority"))?,
                    is_primary: Some(self.flag("Primary")),
                    is_active: Some(self.flag("Active")),
                    description: self.optional_text("Description"),
                };
                body.validate()?;
                Ok(Mutation::UpdateMapping { id, body })
            }
        }
    }
}

fn parse_count(value: &str, field: &'static str, label: &str) -> Result<u32, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::invalid(field, format!("{label} must be a whole number")))
}

fn parse_priority(value: &str) -> Result<Option<i32>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::invalid("priority", "Priority must be a number"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_mapping_without_target_is_rejected() {
        let mut form = Form::create_mapping();
        form.handle_key(press(KeyCode::Tab));
        type_text(&mut form, "repository");

        let err = form.submit().unwrap_err();
        assert_eq!(err.field(), "target_type");
        assert_eq!(err.to_string(), "Target type and asset type are required");
    }

    #[test]
    fn test_mapping_submits_trimmed_values() {
        let mut form = Form::create_mapping();
        type_text(&mut form, " repo ");
        form.handle_key(press(KeyCode::Tab));
        type_text(&mut form, "repository");

        match form.submit().unwrap() {
            Mutation::CreateMapping(request) => {
                assert_eq!(request.target_type, "repo");
                assert_eq!(request.asset_type, "repository");
                assert_eq!(request.is_primary, Some(true));
                assert_eq!(request.priority, None);
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    fn stored_mapping(description: Option<&str>) -> TargetAssetTypeMapping {
        TargetAssetTypeMapping {
            id: uuid::Uuid::new_v4(),
            target_type: "repository".into(),
            asset_type: "code_repo".into(),
            priority: Some(10),
            is_primary: false,
            is_active: true,
            description: description.map(str::to_string),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_edit_mapping_leaves_blank_description_out() {
        let mapping = stored_mapping(None);
        match Form::edit_mapping(&mapping).submit().unwrap() {
            Mutation::UpdateMapping { id, body } => {
                assert_eq!(id, mapping.id);
                assert_eq!(body.target_type.as_deref(), Some("repository"));
                assert_eq!(body.priority, Some(10));
                assert_eq!(body.description, None);
                let wire = serde_json::to_value(&body).unwrap();
                assert!(wire.get("description").is_none());
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[test]
    fn test_edit_mapping_rejects_cleared_target() {
        let mut form = Form::edit_mapping(&stored_mapping(Some("primary repos")));
        for _ in 0.."repository".len() {
            form.handle_key(press(KeyCode::Backspace));
        }
        let err = form.submit().unwrap_err();
        assert_eq!(err.field(), "target_type");
    }

    #[test]
    fn test_token_defaults_submit() {
        let form = Form::create_token();
        match form.submit().unwrap() {
            Mutation::CreateToken(request) => {
                assert_eq!(request.max_uses, 5);
                assert_eq!(request.expires_in_hours, 24);
                assert!(request.allowed_regions.is_empty());
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[test]
    fn test_token_zero_uses_rejected() {
        let mut form = Form::create_token();
        form.focus = 1;
        form.handle_key(press(KeyCode::Backspace));
        type_text(&mut form, "0");
        let err = form.submit().unwrap_err();
        assert_eq!(err.to_string(), "Max uses must be at least 1");
    }

    #[test]
    fn test_number_field_ignores_letters() {
        let mut form = Form::create_token();
        form.focus = 2;
        type_text(&mut form, "x");
        assert_eq!(form.fields[2].display(), "24");
    }

    #[test]
    fn test_admin_role_cycles_from_viewer() {
        let mut form = Form::create_admin();
        type_text(&mut form, "new@rediver.test");
        form.handle_key(press(KeyCode::Tab));
        type_text(&mut form, "New Admin");
        form.handle_key(press(KeyCode::Tab));
        assert_eq!(form.fields[2].display(), "viewer");
        form.handle_key(press(KeyCode::Right));

        match form.submit().unwrap() {
            Mutation::CreateAdmin(request) => assert_eq!(request.role, AdminRole::OpsAdmin),
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[test]
    fn test_admin_requires_name() {
        let mut form = Form::create_admin();
        type_text(&mut form, "new@rediver.test");
        assert_eq!(
            form.submit().unwrap_err().to_string(),
            "Email and name are required"
        );
    }

    #[test]
    fn test_masked_input_hides_value() {
        let mut input = TextInput::masked();
        input.push('a');
        input.push('b');
        assert_eq!(input.display(), "••");
        assert_eq!(input.value(), "ab");
    }
}
