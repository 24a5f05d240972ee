//! An ordered set of config files handled together, e.g. a `my.cnf` and the
//! files it includes.

use std::ops::{Deref, DerefMut};

use serde_json::{Map, Value};

use crate::context::VariableRecord;
use crate::file::ConfigFile;
use crate::syntax::Syntax;

#[derive(Debug, Default, Clone)]
pub struct ConfigFileSet {
    files: Vec<ConfigFile>,
    errors: Vec<String>,
}

impl ConfigFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty file and returns a handle to it.
    pub fn append_new_file(&mut self, syntax: Syntax) -> ConfigFile {
        let file = ConfigFile::new(syntax);
        self.files.push(file.clone());
        file
    }

    /// True if a file with the given path is in the set.
    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|file| file.path() == path)
    }

    /// Parses every file. A file that fails does not stop the others, the
    /// messages are collected in [`ConfigFileSet::errors`].
    pub fn parse(&mut self) -> bool {
        self.errors.clear();

        for file in &self.files {
            if file.parse().is_err() {
                self.errors.push(format!(
                    "Error in file '{}': {}.",
                    file.path(),
                    file.error_string()
                ));
            }
        }

        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The absolute paths of the files included by the members, without
    /// duplicates.
    pub fn collect_include_files(&self) -> Vec<String> {
        let mut files = Vec::new();

        for file in &self.files {
            file.collect_include_files(&mut files);
        }

        files
    }

    /// The assignments of `name` in every file, all of them when `name` is
    /// empty.
    pub fn collect_variables(&self, name: &str) -> Vec<VariableRecord> {
        self.files
            .iter()
            .flat_map(|file| file.collect_variables(name))
            .collect()
    }

    /// The first value of the variable in the section, looking at the files
    /// in order.
    pub fn variable_value(&self, section: &str, name: &str) -> String {
        self.collect_variables(name)
            .into_iter()
            .find(|v| v.section == section)
            .map(|v| v.value)
            .unwrap_or_default()
    }

    /// Changes the variable in the first file that has it, enabled or
    /// disabled. When no file has it, it is added to the first file.
    pub fn change_variable(&self, section: &str, name: &str, value: &str) {
        match self
            .files
            .iter()
            .find(|file| file.has_variable(section, name, true))
        {
            Some(file) => {
                file.change_variable(Some(section), name, value);
            }
            None => {
                if let Some(file) = self.files.first() {
                    log::debug!("adding '{}' to [{}] of '{}'", name, section, file.path());
                    file.add_variable(Some(section), name, value);
                }
            }
        }
    }

    pub fn disable_variable(&self, section: &str, name: &str) {
        for file in &self.files {
            file.disable_variable(Some(section), name);
        }
    }

    pub fn remove_section(&self, section: &str) {
        for file in &self.files {
            file.remove_section(section);
        }
    }

    /// `{ "section": { "name": "value" } }` of every assignment in the set,
    /// a later assignment overwrites an earlier one.
    pub fn to_variant_map(&self) -> Map<String, Value> {
        let mut map = Map::new();

        for variable in self.collect_variables("") {
            let section = map
                .entry(variable.section)
                .or_insert_with(|| Value::Object(Map::new()));

            if let Value::Object(section) = section {
                section.insert(variable.variable_name, Value::String(variable.value));
            }
        }

        map
    }
}

impl Deref for ConfigFileSet {
    type Target = Vec<ConfigFile>;

    fn deref(&self) -> &Self::Target {
        &self.files
    }
}

impl DerefMut for ConfigFileSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.files
    }
}

impl From<Vec<ConfigFile>> for ConfigFileSet {
    fn from(files: Vec<ConfigFile>) -> Self {
        Self {
            files,
            errors: Vec::new(),
        }
    }
}

impl<'a> IntoIterator for &'a ConfigFileSet {
    type Item = &'a ConfigFile;
    type IntoIter = std::slice::Iter<'a, ConfigFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file_set(contents: &[(&str, &str)]) -> ConfigFileSet {
        let mut set = ConfigFileSet::new();

        for (path, content) in contents {
            let file = set.append_new_file(Syntax::MySql);
            file.set_path(*path);
            file.set_content(*content);
        }

        set
    }

    #[test]
    fn test_parse_collects_errors() {
        let mut set = file_set(&[
            ("/etc/my.cnf", "[mysqld]\nport=3306\n"),
            ("/etc/bad.cnf", "[mysqld\n"),
            ("/etc/worse.cnf", "=1\n"),
        ]);

        assert!(!set.parse());
        assert_eq!(set.errors().len(), 2);
        assert!(set.errors()[0].starts_with("Error in file '/etc/bad.cnf': expected ']'"));
        assert!(set.errors()[0].ends_with('.'));
        assert_eq!(set[0].variable_value_in("mysqld", "port"), "3306");

        set.remove(1);
        set.remove(1);
        assert!(set.parse());
        assert!(set.errors().is_empty());
    }

    #[test]
    fn test_change_variable() {
        let mut set = file_set(&[
            ("/etc/my.cnf", "[mysqld]\nport=3306\n"),
            ("/etc/conf.d/extra.cnf", "[mysqld]\n# max_connections=100\n"),
        ]);
        assert!(set.parse());

        set.change_variable("mysqld", "max_connections", "500");
        assert_eq!(set[1].build(), "[mysqld]\nmax_connections=500\n");

        set.change_variable("mysqld", "user", "mysql");
        assert_eq!(set[0].build(), "[mysqld]\nport=3306\nuser=mysql\n");
        assert_eq!(set.variable_value("mysqld", "user"), "mysql");
        assert_eq!(set.variable_value("client", "user"), "");
    }

    #[test]
    fn test_disable_and_remove() {
        let mut set = file_set(&[
            ("/etc/my.cnf", "[mysqld]\nport=3306\n[client]\nport=3306\n"),
            ("/etc/extra.cnf", "[mysqld]\nport=3307\n"),
        ]);
        assert!(set.parse());

        set.disable_variable("mysqld", "port");
        assert_eq!(set[1].build(), "[mysqld]\n# port=3307\n");

        set.remove_section("client");
        assert_eq!(set[0].build(), "[mysqld]\n# port=3306\n");
    }

    #[test]
    fn test_to_variant_map() {
        let mut set = file_set(&[
            ("/etc/my.cnf", "user=root\n[mysqld]\nport=3306\ndatadir=/data\n"),
            ("/etc/extra.cnf", "[mysqld]\nport=3307\n"),
        ]);
        assert!(set.parse());

        assert_eq!(
            Value::Object(set.to_variant_map()),
            json!({
                "": { "user": "root" },
                "mysqld": { "port": "3307", "datadir": "/data" },
            })
        );
    }

    #[test]
    fn test_include_files() {
        let mut set = file_set(&[
            ("/etc/my.cnf", "!include extra.cnf\n!include /etc/common.cnf\n"),
            ("/etc/extra.cnf", "!include /etc/common.cnf\n"),
        ]);
        assert!(set.parse());

        assert!(set.contains("/etc/extra.cnf"));
        assert!(!set.contains("/etc/common.cnf"));
        assert_eq!(
            set.collect_include_files(),
            vec!["/etc/common.cnf", "/etc/extra.cnf"]
        );
        assert_eq!(set.collect_variables("").len(), 0);
        assert_eq!((&set).into_iter().count(), 2);
    }
}
