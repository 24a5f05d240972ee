use clusterconf::error::ConfigError;
use clusterconf::file::ConfigFile;
use clusterconf::file_set::ConfigFileSet;
use clusterconf::syntax::Syntax;

fn mysql(content: &str) -> ConfigFile {
    let file = ConfigFile::new(Syntax::MySql);
    file.parse_str(content).unwrap();
    file
}

#[test]
fn test_change() {
    let file = mysql("[mysqld]\nport=3306\n");
    assert!(file.change_variable(Some("mysqld"), "port", "3307"));
    assert_eq!(file.build(), "[mysqld]\nport=3307\n");

    assert!(!file.change_variable(Some("client"), "port", "1"));
    assert_eq!(file.build(), "[mysqld]\nport=3307\n");
}

#[test]
fn test_change_enables() {
    let file = mysql("[mysqld]\n# port=3306\n");
    assert!(!file.has_variable("mysqld", "port", false));

    assert!(file.change_variable(Some("mysqld"), "port", "3307"));
    assert!(file.has_variable("mysqld", "port", false));
    assert_eq!(file.build(), "[mysqld]\nport=3307\n");
}

#[test]
fn test_disable() {
    let file = mysql("port=3306\n");
    assert!(file.disable_variable(None, "port"));
    assert_eq!(file.build(), "# port=3306\n");

    assert!(file.disable_variable(None, "port"));
    assert_eq!(file.build(), "# port=3306\n");

    // the disabled form parses back the same way
    let reparsed = mysql(&file.build());
    assert!(reparsed.has_variable("", "port", true));
    assert_eq!(reparsed.build(), "# port=3306\n");
}

#[test]
fn test_remove_one_occurrence() {
    let file = mysql("[mysqld]\nport=1\nport=2\n");
    assert!(file.remove_variable(Some("mysqld"), "port"));
    assert_eq!(file.variable_value_in("mysqld", "port"), "2");
    assert!(file.remove_variable(Some("mysqld"), "port"));
    assert!(!file.remove_variable(Some("mysqld"), "port"));
}

#[test]
fn test_add_to_empty_file() {
    let file = mysql("");
    assert!(file.add_variable(Some("mysqld"), "socket", "/tmp/mysql.sock"));
    assert_eq!(file.build(), "\n[mysqld]\nsocket=/tmp/mysql.sock\n");
    assert_eq!(file.variable_value_in("mysqld", "socket"), "/tmp/mysql.sock");
}

#[test]
fn test_add_keeps_inline_comment() {
    let file = mysql("[mysqld]\nport=3306 # default\n\n[client]\n");
    assert!(file.add_variable(Some("mysqld"), "user", "mysql"));
    assert_eq!(
        file.build(),
        "[mysqld]\nport=3306 # default\nuser=mysql\n\n[client]\n"
    );
    assert_eq!(file.variable_value_in("mysqld", "user"), "mysql");
}

#[test]
fn test_add_then_reparse() {
    let file = mysql("[mysqld]\nport=3306\n");
    assert!(file.add_variable(Some("galera"), "wsrep_on", "ON"));
    assert!(file.add_variable(None, "user", "root"));

    let reparsed = mysql(&file.build());
    assert_eq!(reparsed.variable_value_in("galera", "wsrep_on"), "ON");
    assert_eq!(reparsed.variable_value_in("", "user"), "root");
    assert_eq!(reparsed.variable_value_in("mysqld", "port"), "3306");
}

#[test]
fn test_bare_flag_gets_a_value() {
    let file = mysql("[mysqld]\nskip-name-resolve\n");
    assert!(file.change_variable(Some("mysqld"), "skip-name-resolve", "1"));
    assert_eq!(file.build(), "[mysqld]\nskip-name-resolve=1\n");
}

#[test]
fn test_haproxy_edit() {
    let file = ConfigFile::new(Syntax::HaProxy);
    file.parse_str("global\n    maxconn 256\n\nfrontend http-in\n    bind *:80 ssl\n")
        .unwrap();

    assert!(file.has_section("frontend"));
    assert_eq!(file.variable_value_in("frontend", "bind"), "*:80 ssl");

    assert!(file.change_variable(Some("global"), "maxconn", "4096"));
    assert!(file.change_variable(Some("frontend"), "bind", "*:443"));
    assert_eq!(
        file.build(),
        "global\n    maxconn 4096\n\nfrontend http-in\n    bind *:443\n"
    );
}

#[test]
fn test_yaml_edit() {
    let file = ConfigFile::new(Syntax::Yaml);
    file.parse_str("cmon:\n  port: 9500\n").unwrap();

    assert!(file.set_variable("cmon", "port", "9501"));
    assert!(file.set_variable("cmon", "hostname", "localhost"));
    assert_eq!(file.build(), "cmon:\n  port: 9501\n  hostname: localhost\n");
}

#[test]
fn test_includes_resolved_against_the_file() {
    let mut set = ConfigFileSet::new();

    let main = set.append_new_file(Syntax::MySql);
    main.set_path("/etc/mysql/my.cnf");
    main.set_content("!include conf.d/extra.cnf\n!include /etc/mysql/conf.d/extra.cnf\n");

    let other = set.append_new_file(Syntax::MySql);
    other.set_path("/etc/mysql/debian.cnf");
    other.set_content("!include ./conf.d/../conf.d/extra.cnf\n!include common.cnf\n");

    assert!(set.parse());
    assert_eq!(
        set.collect_include_files(),
        vec![
            "/etc/mysql/conf.d/extra.cnf",
            "/etc/mysql/./conf.d/../conf.d/extra.cnf",
            "/etc/mysql/common.cnf",
        ]
    );
}

#[test]
fn test_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("my.cnf");
    std::fs::write(&path, "[mysqld]\nport = 3306  # the port\n").unwrap();

    let file = ConfigFile::new(Syntax::MySql);
    file.set_file_name(path.to_string_lossy());
    assert!(file.source_file_exists());
    file.parse_source_file().unwrap();
    assert!(file.change_variable(Some("mysqld"), "port", "3307"));
    file.save().unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "[mysqld]\nport = 3307  # the port\n"
    );
}

#[test]
fn test_parse_error_in_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.cnf");
    std::fs::write(&path, "[mysqld]\nport 3306\n").unwrap();

    let file = ConfigFile::new(Syntax::MySql);
    file.set_file_name(path.to_string_lossy());

    match file.parse_source_file() {
        Err(ConfigError::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(file.error_string().contains("line 2"));
}
