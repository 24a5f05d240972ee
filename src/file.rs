//! One config file: its content, where it lives and what was parsed from it.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use twox_hash::XxHash3_64;

use crate::context::{ParseContext, VariableRecord};
use crate::error::{ConfigError, Result};
use crate::parser;
use crate::syntax::Syntax;

#[derive(Debug, Default, Clone)]
struct ConfigFileData {
    syntax: Syntax,
    content: String,
    file_name: String,
    path: String,
    name: String,
    size: usize,
    crc: u64,
    timestamp: u64,
    has_change: bool,
    include_level: usize,
    search_groups: Vec<String>,
    context: Option<ParseContext>,
}

/// A config file handle.
///
/// Cloning the handle does not copy the file, every clone sees the same
/// content and the same parsed nodes. Use [`ConfigFile::deep_clone`] for an
/// independent copy.
///
/// `file_name` is where the file is read from and written to on this machine,
/// `path` is the full path of the file on the host it belongs to. Include
/// directives are resolved against the directory of `path`.
#[derive(Debug, Default, Clone)]
pub struct ConfigFile {
    data: Rc<RefCell<ConfigFileData>>,
}

impl ConfigFile {
    pub fn new(syntax: Syntax) -> Self {
        let data = ConfigFileData {
            syntax,
            ..Default::default()
        };

        Self {
            data: Rc::new(RefCell::new(data)),
        }
    }

    pub fn deep_clone(&self) -> Self {
        Self {
            data: Rc::new(RefCell::new(self.data.borrow().clone())),
        }
    }

    /// True if both handles refer to the same file.
    pub fn ptr_eq(&self, other: &ConfigFile) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn syntax(&self) -> Syntax {
        self.data.borrow().syntax
    }

    pub fn set_content(&self, content: impl Into<String>) {
        let mut data = self.data.borrow_mut();
        data.content = content.into();

        if data.size == 0 {
            data.size = data.content.len();
        }
    }

    pub fn content(&self) -> String {
        self.data.borrow().content.clone()
    }

    pub fn set_size(&self, size: usize) {
        self.data.borrow_mut().size = size;
    }

    pub fn size(&self) -> usize {
        self.data.borrow().size
    }

    pub fn set_file_name(&self, file_name: impl Into<String>) {
        self.data.borrow_mut().file_name = file_name.into();
    }

    pub fn file_name(&self) -> String {
        self.data.borrow().file_name.clone()
    }

    pub fn source_file_exists(&self) -> bool {
        let data = self.data.borrow();
        !data.file_name.is_empty() && Path::new(&data.file_name).exists()
    }

    pub fn set_path(&self, path: impl Into<String>) {
        self.data.borrow_mut().path = path.into();
    }

    pub fn path(&self) -> String {
        self.data.borrow().path.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.data.borrow_mut().name = name.into();
    }

    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    pub fn set_crc(&self, crc: u64) {
        self.data.borrow_mut().crc = crc;
    }

    pub fn crc(&self) -> u64 {
        self.data.borrow().crc
    }

    pub fn crc_str(&self) -> String {
        format!("{:08x}", self.crc())
    }

    /// Computes the checksum of the current content.
    pub fn update_crc(&self) -> u64 {
        let mut data = self.data.borrow_mut();
        data.crc = XxHash3_64::oneshot(data.content.as_bytes());
        data.crc
    }

    pub fn set_has_change(&self, has_change: bool) {
        self.data.borrow_mut().has_change = has_change;
    }

    pub fn has_change(&self) -> bool {
        self.data.borrow().has_change
    }

    /// Sets the modification time in seconds since the epoch, 0 means now.
    pub fn set_timestamp(&self, timestamp: u64) {
        let timestamp = if timestamp == 0 {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default()
        } else {
            timestamp
        };

        self.data.borrow_mut().timestamp = timestamp;
    }

    pub fn timestamp(&self) -> u64 {
        self.data.borrow().timestamp
    }

    /// 0 for a file opened by the user, 1 for the files it includes and so on.
    pub fn set_include_level(&self, level: usize) {
        self.data.borrow_mut().include_level = level;
    }

    pub fn include_level(&self) -> usize {
        self.data.borrow().include_level
    }

    /// Sections consulted in this order when a variable is looked up without
    /// a section.
    pub fn append_search_group(&self, section: impl Into<String>) {
        self.data.borrow_mut().search_groups.push(section.into());
    }

    /// Parses the content set before, the nodes of a previous parse are
    /// dropped.
    pub fn parse(&self) -> Result<()> {
        let mut data = self.data.borrow_mut();
        let mut context = ParseContext::new(data.syntax);
        let result = parser::parse(data.syntax, &data.content, &mut context);

        match &result {
            Ok(()) => log::debug!(
                "parsed {} config '{}', {} nodes",
                data.syntax,
                data.path,
                context.nodes().len()
            ),
            Err(err) => log::warn!("failed to parse '{}': {}", data.path, err),
        }

        data.context = Some(context);
        result
    }

    pub fn parse_str(&self, source: &str) -> Result<()> {
        self.set_content(source);
        self.parse()
    }

    /// Reads the file set by [`ConfigFile::set_file_name`] and parses it.
    pub fn parse_source_file(&self) -> Result<()> {
        let file_name = self.file_name();
        if file_name.is_empty() {
            return Err(self.record_error(ConfigError::NoFileName));
        }

        let content = std::fs::read_to_string(&file_name)
            .map_err(|e| self.record_error(ConfigError::io(&file_name, e)))?;
        self.parse_str(&content)
    }

    /// Writes the rendered nodes into the file set by
    /// [`ConfigFile::set_file_name`].
    pub fn save(&self) -> Result<()> {
        let file_name = self.file_name();
        if file_name.is_empty() {
            return Err(self.record_error(ConfigError::NoFileName));
        }

        let content = self.build();
        std::fs::write(&file_name, &content)
            .map_err(|e| self.record_error(ConfigError::io(&file_name, e)))?;
        log::debug!("saved '{}', {} bytes", file_name, content.len());

        Ok(())
    }

    /// The message of the last failed parse, load or save, empty if the last
    /// parse succeeded.
    pub fn error_string(&self) -> String {
        self.with_context(|context| context.error_string().to_string())
    }

    fn record_error(&self, err: ConfigError) -> ConfigError {
        log::warn!("{}", err);

        let mut data = self.data.borrow_mut();
        let syntax = data.syntax;
        data.context
            .get_or_insert_with(|| ParseContext::new(syntax))
            .set_error(err.to_string());

        err
    }

    pub fn build(&self) -> String {
        self.with_context(ParseContext::build)
    }

    pub fn dump(&self) -> String {
        let dump = self.with_context(ParseContext::dump);
        log::trace!("nodes of '{}':\n{}", self.path(), dump);
        dump
    }

    fn with_context<T: Default>(&self, f: impl FnOnce(&ParseContext) -> T) -> T {
        self.data.borrow().context.as_ref().map(f).unwrap_or_default()
    }

    fn with_context_mut<T: Default>(&self, f: impl FnOnce(&mut ParseContext) -> T) -> T {
        self.data
            .borrow_mut()
            .context
            .as_mut()
            .map(f)
            .unwrap_or_default()
    }

    /// Every assignment of `name`, all of them when `name` is empty.
    pub fn collect_variables(&self, name: &str) -> Vec<VariableRecord> {
        let path = self.path();
        self.with_context(|context| context.collect_variables(name, &path))
    }

    /// The value of a variable looked up in the search groups first, then
    /// anywhere in the file. Quotes around the value are removed.
    pub fn variable_value(&self, name: &str) -> String {
        let variables = self.collect_variables(name);
        let search_groups = self.data.borrow().search_groups.clone();

        let found = search_groups
            .iter()
            .find_map(|group| variables.iter().find(|v| &v.section == group))
            .or_else(|| variables.first());

        found.map(|v| unquote(&v.value).to_string()).unwrap_or_default()
    }

    /// The value of a variable in the given section only.
    pub fn variable_value_in(&self, section: &str, name: &str) -> String {
        self.collect_variables(name)
            .iter()
            .find(|v| v.section == section)
            .map(|v| unquote(&v.value).to_string())
            .unwrap_or_default()
    }

    /// The value from the section, then the search groups, then `default`.
    pub fn variable_value_or(&self, section: &str, name: &str, default: &str) -> String {
        let value = self.variable_value_in(section, name);
        if !value.is_empty() {
            return value;
        }

        let value = self.variable_value(name);
        if !value.is_empty() {
            return value;
        }

        default.to_string()
    }

    /// The value split at `;` and `,`, e.g. `tags=first;second`.
    pub fn variable_value_as_list(&self, name: &str) -> Vec<String> {
        self.variable_value(name)
            .split([';', ','])
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn has_variable(&self, section: &str, name: &str, including_disabled: bool) -> bool {
        self.with_context(|context| context.has_variable(section, name, including_disabled))
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.with_context(|context| context.has_section(name))
    }

    /// Changes the value, a disabled variable is enabled again. With no
    /// section every occurrence is changed.
    pub fn change_variable(&self, section: Option<&str>, name: &str, value: &str) -> bool {
        self.with_context_mut(|context| context.change_variable(section, name, value))
    }

    pub fn disable_variable(&self, section: Option<&str>, name: &str) -> bool {
        self.with_context_mut(|context| context.disable_variable(section, name))
    }

    pub fn remove_variable(&self, section: Option<&str>, name: &str) -> bool {
        self.with_context_mut(|context| context.remove_variable(section, name))
    }

    pub fn remove_section(&self, name: &str) -> bool {
        self.with_context_mut(|context| context.remove_section(name))
    }

    /// Adds a variable, the section is created when the file does not have it.
    pub fn add_variable(&self, section: Option<&str>, name: &str, value: &str) -> bool {
        self.with_context_mut(|context| context.add_variable(section, name, value))
    }

    /// Changes the variable in the section, or in the global part of the
    /// file, or adds it to the section when it is nowhere to be found.
    pub fn set_variable(&self, section: &str, name: &str, value: &str) -> bool {
        if self.has_variable(section, name, false) {
            self.change_variable(Some(section), name, value)
        } else if self.has_variable("", name, false) {
            self.change_variable(Some(""), name, value)
        } else {
            self.add_variable(Some(section), name, value)
        }
    }

    /// Appends the included files to `files` with absolute paths, names
    /// already in the list are skipped.
    pub fn collect_include_files(&self, files: &mut Vec<String>) {
        let names = self.with_context(|context| context.include_files());
        self.collect_resolved(names.into_keys(), files);
    }

    pub fn collect_include_dirs(&self, dirs: &mut Vec<String>) {
        let names = self.with_context(|context| context.include_dirs());
        self.collect_resolved(names.into_keys(), dirs);
    }

    fn collect_resolved(&self, names: impl Iterator<Item = String>, out: &mut Vec<String>) {
        let path = self.path();
        let dir = Path::new(&path).parent().unwrap_or_else(|| Path::new(""));

        for name in names {
            let resolved = if Path::new(&name).is_absolute() {
                name
            } else {
                dir.join(&name).to_string_lossy().into_owned()
            };

            if !out.contains(&resolved) {
                out.push(resolved);
            }
        }
    }

    /// Appends the names of all variables to `names`, then sorts it.
    pub fn collect_variable_names(&self, names: &mut Vec<String>) {
        let found = self.with_context(|context| context.variable_names());

        for name in found.into_keys() {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        names.sort();
    }
}

/// Removes one pair of matching quotes around the value.
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(value)
}
