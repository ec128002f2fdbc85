use tracing::debug;

use crate::console::message::{Effect, Msg};
use crate::service::{BucketParams, ErrorKind, InstanceParams, ResourceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    BucketMenu,
    InstanceMenu,
    BucketCreateForm,
    InstanceCreateForm,
    ResultScreen,
}

impl Screen {
    pub const fn title(self) -> &'static str {
        match self {
            Self::MainMenu => "AWS Resources",
            Self::BucketMenu => "S3 - Simple Storage Service",
            Self::InstanceMenu => "EC2 - Elastic Compute Cloud",
            Self::BucketCreateForm => "Create S3 Bucket",
            Self::InstanceCreateForm => "Create EC2 Instances",
            Self::ResultScreen => "Result",
        }
    }

    pub const fn choices(self) -> &'static [&'static str] {
        match self {
            Self::MainMenu => &["S3 - Manage Buckets", "EC2 - Manage Instances", "Exit"],
            Self::BucketMenu => &["Create Bucket", "Back to Main Menu"],
            Self::InstanceMenu => &["Create Instances", "Back to Main Menu"],
            Self::BucketCreateForm => &["Create Bucket", "Back to S3 Menu"],
            Self::InstanceCreateForm => &["Launch Instances", "Back to EC2 Menu"],
            Self::ResultScreen => &[],
        }
    }

    /// Where Back leads.
    pub const fn parent(self) -> Self {
        match self {
            Self::MainMenu | Self::BucketMenu | Self::InstanceMenu | Self::ResultScreen => {
                Self::MainMenu
            }
            Self::BucketCreateForm => Self::BucketMenu,
            Self::InstanceCreateForm => Self::InstanceMenu,
        }
    }

    pub const fn is_form(self) -> bool {
        matches!(self, Self::BucketCreateForm | Self::InstanceCreateForm)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }

    fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Text buffers of one create form plus which one has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    fields: Vec<Field>,
    focused: usize,
}

impl Form {
    fn new(fields: Vec<Field>) -> Self {
        Self { fields, focused: 0 }
    }

    fn bucket(region: &str) -> Self {
        Self::new(vec![Field::new("Bucket Name", ""), Field::new("Region", region)])
    }

    fn instance(region: &str) -> Self {
        Self::new(vec![
            Field::new("Image ID (AMI)", ""),
            Field::new("Instance Type", ""),
            Field::new("Key Name", ""),
            Field::new("Count", "1"),
            Field::new("Region", region),
        ])
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub const fn focused(&self) -> usize {
        self.focused
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.trim())
    }

    fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    fn push(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(c);
        }
    }

    fn pop(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }
}

const BUCKET_NAME: usize = 0;
const BUCKET_REGION: usize = 1;

const IMAGE_ID: usize = 0;
const INSTANCE_TYPE: usize = 1;
const KEY_NAME: usize = 2;
const COUNT: usize = 3;
const INSTANCE_REGION: usize = 4;

/// State of the interactive console.
#[derive(Debug, Clone)]
pub struct Model {
    screen: Screen,
    cursor: usize,
    editing: bool,
    pending: bool,
    should_quit: bool,
    default_region: String,
    bucket_form: Form,
    instance_form: Form,
    result: Option<ResourceResult>,
}

impl Model {
    /// A console on the main menu whose forms start out with `region`.
    pub fn new(region: impl Into<String>) -> Self {
        let default_region = region.into();
        Self {
            screen: Screen::MainMenu,
            cursor: 0,
            editing: false,
            pending: false,
            should_quit: false,
            bucket_form: Form::bucket(&default_region),
            instance_form: Form::instance(&default_region),
            default_region,
            result: None,
        }
    }

    pub const fn screen(&self) -> Screen {
        self.screen
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// A create request is in flight.
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub const fn result(&self) -> Option<&ResourceResult> {
        self.result.as_ref()
    }

    /// The form shown on the current screen, if it is a form.
    pub const fn form(&self) -> Option<&Form> {
        match self.screen {
            Screen::BucketCreateForm => Some(&self.bucket_form),
            Screen::InstanceCreateForm => Some(&self.instance_form),
            _ => None,
        }
    }

    const fn form_mut(&mut self) -> Option<&mut Form> {
        match self.screen {
            Screen::BucketCreateForm => Some(&mut self.bucket_form),
            Screen::InstanceCreateForm => Some(&mut self.instance_form),
            _ => None,
        }
    }

    /// Apply one message. Returns the side effect the app has to run, if any.
    pub fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Quit => self.should_quit = true,
            Msg::Up if !self.editing => self.move_cursor(false),
            Msg::Down if !self.editing => self.move_cursor(true),
            Msg::Activate => return self.activate(),
            Msg::Back => self.back(),
            Msg::NextField => {
                if let Some(form) = self.form_mut() {
                    form.next_field();
                }
            }
            Msg::Edit => self.editing = self.screen.is_form(),
            Msg::Input(c) if self.editing => {
                if let Some(form) = self.form_mut() {
                    form.push(c);
                }
            }
            Msg::Backspace if self.editing => {
                if let Some(form) = self.form_mut() {
                    form.pop();
                }
            }
            Msg::ResourceCreated(result) => {
                self.pending = false;
                self.show_result(result);
            }
            Msg::Up | Msg::Down | Msg::Input(_) | Msg::Backspace => {}
        }
        None
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = self.screen.choices().len();
        if len == 0 {
            return;
        }
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    fn go_to(&mut self, screen: Screen) {
        debug!(from = ?self.screen, to = ?screen, "Console navigation");
        self.screen = screen;
        self.cursor = 0;
        self.editing = false;
        if let Some(form) = self.form_mut() {
            form.focused = 0;
        }
    }

    fn back(&mut self) {
        if self.editing {
            self.editing = false;
        } else if self.screen != Screen::MainMenu {
            self.go_to(self.screen.parent());
        }
    }

    fn activate(&mut self) -> Option<Effect> {
        if self.editing {
            self.editing = false;
            return None;
        }

        match (self.screen, self.cursor) {
            (Screen::MainMenu, 0) => self.go_to(Screen::BucketMenu),
            (Screen::MainMenu, 1) => self.go_to(Screen::InstanceMenu),
            (Screen::MainMenu, _) => self.should_quit = true,
            (Screen::BucketMenu, 0) => self.go_to(Screen::BucketCreateForm),
            (Screen::InstanceMenu, 0) => self.go_to(Screen::InstanceCreateForm),
            (Screen::BucketCreateForm | Screen::InstanceCreateForm, 0) => return self.submit(),
            (Screen::ResultScreen, _) => {}
            (screen, _) => self.go_to(screen.parent()),
        }
        None
    }

    fn submit(&mut self) -> Option<Effect> {
        if self.pending {
            debug!("Ignoring submit while a request is pending");
            return None;
        }

        let effect = match self.screen {
            Screen::BucketCreateForm => self.bucket_effect(),
            Screen::InstanceCreateForm => self.instance_effect(),
            _ => return None,
        };

        match effect {
            Ok(effect) => {
                self.pending = true;
                Some(effect)
            }
            Err(message) => {
                self.show_result(ResourceResult::failure(ErrorKind::ValidationError, message));
                None
            }
        }
    }

    fn region_or_default(&self, value: &str) -> String {
        if value.is_empty() {
            self.default_region.clone()
        } else {
            value.to_string()
        }
    }

    fn bucket_effect(&self) -> Result<Effect, &'static str> {
        let form = &self.bucket_form;
        if form.fields[BUCKET_NAME].is_blank() {
            return Err("Bucket name is required");
        }

        let region = self.region_or_default(form.value(BUCKET_REGION));
        let params = BucketParams::new(form.value(BUCKET_NAME)).with_region(&region);
        Ok(Effect::CreateBucket { region, params })
    }

    fn instance_effect(&self) -> Result<Effect, &'static str> {
        let form = &self.instance_form;
        if [IMAGE_ID, INSTANCE_TYPE, KEY_NAME]
            .iter()
            .any(|&i| form.fields[i].is_blank())
        {
            return Err("Image ID, instance type, and key name are required");
        }

        let region = self.region_or_default(form.value(INSTANCE_REGION));
        let mut params = InstanceParams::new(
            form.value(IMAGE_ID),
            form.value(INSTANCE_TYPE),
            form.value(KEY_NAME),
        )
        .with_region(&region);
        let count = form.value(COUNT);
        if !count.is_empty() {
            params.count = InstanceParams::count_from_text(count);
        }
        Ok(Effect::LaunchInstances { region, params })
    }

    fn show_result(&mut self, result: ResourceResult) {
        self.result = Some(result);
        self.go_to(Screen::ResultScreen);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn model() -> Model {
        Model::new("us-east-1")
    }

    fn type_text(model: &mut Model, text: &str) {
        for c in text.chars() {
            model.update(Msg::Input(c));
        }
    }

    /// Navigate from the main menu into the create form of entry `menu_index`.
    fn open_form(model: &mut Model, menu_index: usize) {
        for _ in 0..menu_index {
            model.update(Msg::Down);
        }
        model.update(Msg::Activate);
        model.update(Msg::Activate);
    }

    #[test]
    fn test_starts_on_main_menu() {
        let model = model();
        assert_eq!(model.screen(), Screen::MainMenu);
        assert_eq!(model.cursor(), 0);
        assert!(!model.should_quit());
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let mut model = model();

        model.update(Msg::Up);
        assert_eq!(model.cursor(), 2);

        model.update(Msg::Down);
        assert_eq!(model.cursor(), 0);

        model.update(Msg::Down);
        model.update(Msg::Down);
        model.update(Msg::Down);
        assert_eq!(model.cursor(), 0);
    }

    #[test]
    fn test_main_menu_navigation() {
        let mut model = model();

        model.update(Msg::Activate);
        assert_eq!(model.screen(), Screen::BucketMenu);

        model.update(Msg::Back);
        assert_eq!(model.screen(), Screen::MainMenu);

        model.update(Msg::Down);
        model.update(Msg::Activate);
        assert_eq!(model.screen(), Screen::InstanceMenu);
        assert_eq!(model.cursor(), 0);
    }

    #[test]
    fn test_exit_choice_quits() {
        let mut model = model();
        model.update(Msg::Up);
        model.update(Msg::Activate);
        assert!(model.should_quit());
    }

    #[test]
    fn test_back_choices_return_to_parent() {
        let mut model = model();
        model.update(Msg::Activate);
        model.update(Msg::Down);
        model.update(Msg::Activate);
        assert_eq!(model.screen(), Screen::MainMenu);

        open_form(&mut model, 1);
        assert_eq!(model.screen(), Screen::InstanceCreateForm);
        model.update(Msg::Down);
        model.update(Msg::Activate);
        assert_eq!(model.screen(), Screen::InstanceMenu);
    }

    #[test]
    fn test_back_on_main_menu_stays() {
        let mut model = model();
        model.update(Msg::Back);
        assert_eq!(model.screen(), Screen::MainMenu);
        assert!(!model.should_quit());
    }

    #[test]
    fn test_form_defaults() {
        let mut model = Model::new("eu-west-1");
        open_form(&mut model, 1);

        let form = model.form().unwrap();
        let values: Vec<&str> = form.fields().iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, ["", "", "", "1", "eu-west-1"]);
    }

    #[test]
    fn test_next_field_cycles() {
        let mut model = model();
        open_form(&mut model, 0);

        model.update(Msg::NextField);
        assert_eq!(model.form().unwrap().focused(), 1);
        model.update(Msg::NextField);
        assert_eq!(model.form().unwrap().focused(), 0);
    }

    #[test]
    fn test_typing_requires_edit_mode() {
        let mut model = model();
        open_form(&mut model, 0);

        type_text(&mut model, "abc");
        assert_eq!(model.form().unwrap().fields()[0].value, "");

        model.update(Msg::Edit);
        assert!(model.is_editing());
        type_text(&mut model, "logs-2024x");
        model.update(Msg::Backspace);
        assert_eq!(model.form().unwrap().fields()[0].value, "logs-2024");
    }

    #[test]
    fn test_navigation_ignored_while_editing() {
        let mut model = model();
        open_form(&mut model, 0);
        model.update(Msg::Edit);

        model.update(Msg::Down);
        assert_eq!(model.cursor(), 0);
    }

    #[test]
    fn test_activate_and_back_leave_edit_mode() {
        let mut model = model();
        open_form(&mut model, 0);

        model.update(Msg::Edit);
        assert_eq!(model.update(Msg::Activate), None);
        assert!(!model.is_editing());
        assert_eq!(model.screen(), Screen::BucketCreateForm);

        model.update(Msg::Edit);
        model.update(Msg::Back);
        assert!(!model.is_editing());
        assert_eq!(model.screen(), Screen::BucketCreateForm);
    }

    #[test]
    fn test_edit_outside_form_is_ignored() {
        let mut model = model();
        model.update(Msg::Edit);
        assert!(!model.is_editing());
    }

    #[test]
    fn test_back_from_form_resets_focus() {
        let mut model = model();
        open_form(&mut model, 0);
        model.update(Msg::NextField);

        model.update(Msg::Back);
        assert_eq!(model.screen(), Screen::BucketMenu);

        model.update(Msg::Activate);
        assert_eq!(model.form().unwrap().focused(), 0);
    }

    #[test]
    fn test_submit_bucket_emits_effect() {
        let mut model = model();
        open_form(&mut model, 0);
        model.update(Msg::Edit);
        type_text(&mut model, "logs-2024");
        model.update(Msg::Activate);

        let effect = model.update(Msg::Activate);

        assert_eq!(
            effect,
            Some(Effect::CreateBucket {
                region: "us-east-1".to_string(),
                params: BucketParams::new("logs-2024").with_region("us-east-1"),
            })
        );
        assert!(model.is_pending());
    }

    #[test]
    fn test_submit_ignored_while_pending() {
        let mut model = model();
        open_form(&mut model, 0);
        model.update(Msg::Edit);
        type_text(&mut model, "logs");
        model.update(Msg::Activate);

        assert!(model.update(Msg::Activate).is_some());
        assert_eq!(model.update(Msg::Activate), None);
    }

    #[test]
    fn test_submit_bucket_without_name_fails_locally() {
        let mut model = model();
        open_form(&mut model, 0);

        assert_eq!(model.update(Msg::Activate), None);
        assert_eq!(model.screen(), Screen::ResultScreen);
        assert!(!model.is_pending());

        let result = model.result().unwrap();
        assert_eq!(result.error(), Some(ErrorKind::ValidationError));
        assert_eq!(result.message(), "Bucket name is required");
    }

    #[test]
    fn test_submit_instances_builds_params() {
        let mut model = model();
        open_form(&mut model, 1);
        model.update(Msg::Edit);
        type_text(&mut model, "ami-0abcdef1234567890");
        model.update(Msg::NextField);
        type_text(&mut model, "t3.small");
        model.update(Msg::NextField);
        type_text(&mut model, "production-key");
        model.update(Msg::NextField);
        model.update(Msg::Backspace);
        type_text(&mut model, "3");
        model.update(Msg::NextField);
        for _ in 0.."us-east-1".len() {
            model.update(Msg::Backspace);
        }
        type_text(&mut model, "eu-west-1");
        model.update(Msg::Activate);

        let Some(Effect::LaunchInstances { region, params }) = model.update(Msg::Activate) else {
            panic!("expected a launch effect");
        };
        assert_eq!(region, "eu-west-1");
        assert_eq!(
            params,
            InstanceParams::new("ami-0abcdef1234567890", "t3.small", "production-key")
                .with_count(3)
                .with_region("eu-west-1")
        );
    }

    #[test]
    fn test_blank_region_uses_default() {
        let mut model = Model::new("ap-south-1");
        open_form(&mut model, 0);
        model.update(Msg::Edit);
        type_text(&mut model, "logs");
        model.update(Msg::NextField);
        for _ in 0.."ap-south-1".len() {
            model.update(Msg::Backspace);
        }
        model.update(Msg::Activate);

        let Some(Effect::CreateBucket { region, .. }) = model.update(Msg::Activate) else {
            panic!("expected a bucket effect");
        };
        assert_eq!(region, "ap-south-1");
    }

    #[test]
    fn test_submit_instances_requires_fields() {
        let mut model = model();
        open_form(&mut model, 1);
        model.update(Msg::Edit);
        type_text(&mut model, "ami-1");
        model.update(Msg::Activate);

        assert_eq!(model.update(Msg::Activate), None);
        assert_eq!(
            model.result().unwrap().message(),
            "Image ID, instance type, and key name are required"
        );
    }

    #[test]
    fn test_result_delivery_and_return() {
        let mut model = model();
        open_form(&mut model, 0);
        model.update(Msg::Edit);
        type_text(&mut model, "logs");
        model.update(Msg::Activate);
        model.update(Msg::Activate);

        model.update(Msg::ResourceCreated(ResourceResult::success(
            "Successfully created S3 bucket 'logs' in region 'us-east-1'",
            Map::new(),
        )));
        assert_eq!(model.screen(), Screen::ResultScreen);
        assert!(!model.is_pending());
        assert!(model.result().unwrap().is_success());

        model.update(Msg::Back);
        assert_eq!(model.screen(), Screen::MainMenu);
    }

    #[test]
    fn test_quit() {
        let mut model = model();
        model.update(Msg::Quit);
        assert!(model.should_quit());
    }
}
