use crate::demote::Demotion;
use crate::mocksystem;
use crate::run::{collect, RunOptions};
use crate::testlog;
use crate::users::Account;
use crate::util::map;

fn prod() -> RunOptions {
    RunOptions {
        environment: "prod".to_string(),
    }
}

#[test]
pub fn test_one_jvm_end_to_end() {
    let system = mocksystem::Builder::new()
        .with_executables(&["pgrep", "ps", "jstat"])
        .with_users(vec![Account {
            name: "app".to_string(),
            uid: 500,
            gid: 501,
        }])
        .with_outputs(map! {
            "pgrep java".to_string() => "1234\n".to_string(),
            "ps -p 1234 -o command=".to_string() => "java -jar app.jar\n".to_string(),
            "ps -p 1234 -o user=".to_string() => "app\n".to_string(),
            "jstat -gc 1234".to_string() => "S0C S1C EC OC\n100 100 2048 4096\n".to_string()
        })
        .freeze();

    let mut lines: Vec<String> = vec![];
    collect(&system, &prod(), &mut |l| lines.push(l.to_string()));

    // Only -gc printed anything.
    assert_eq!(
        lines,
        vec![
            "application=jstatmon environment=prod option=-gc user=app pid=1234 command=java -jar app.jar \
             gc_current_survivor_space_0_capacity_kB=100 gc_current_survivor_space_1_capacity_kB=100 \
             gc_current_eden_space_capacity_kB=2048 gc_current_old_space_capacity_kB=4096"
        ]
    );
    assert!(system
        .demotions()
        .iter()
        .all(|(_, d)| *d == Demotion { uid: 500, gid: 501 }));
}

#[test]
pub fn test_no_pgrep() {
    testlog::capture();
    let system = mocksystem::Builder::new()
        .with_executables(&["ps", "jstat"])
        .freeze();
    let mut lines: Vec<String> = vec![];
    collect(&system, &prod(), &mut |l| lines.push(l.to_string()));
    assert!(lines.is_empty());
    assert!(system.commands().is_empty());
    assert_eq!(system.lookups(), vec!["pgrep"]);
    assert_eq!(testlog::count(log::Level::Error), 1);
}

#[test]
pub fn test_no_java_processes() {
    let system = mocksystem::Builder::new()
        .with_executables(&["pgrep", "ps", "jstat"])
        .freeze();
    let mut lines: Vec<String> = vec![];
    collect(&system, &prod(), &mut |l| lines.push(l.to_string()));
    assert!(lines.is_empty());
    assert_eq!(system.commands(), vec!["pgrep java"]);
}

#[test]
pub fn test_no_ps_skips_every_process() {
    let system = mocksystem::Builder::new()
        .with_executables(&["pgrep", "jstat"])
        .with_outputs(map! { "pgrep java".to_string() => "1\n2\n".to_string() })
        .freeze();
    let mut lines: Vec<String> = vec![];
    collect(&system, &prod(), &mut |l| lines.push(l.to_string()));
    assert!(lines.is_empty());
    // Never got as far as jstat
    assert!(!system.lookups().iter().any(|l| l == "jstat"));
    assert_eq!(system.commands(), vec!["pgrep java"]);
}

#[test]
pub fn test_failures_are_isolated_per_process() {
    // 10 belongs to a user we can't resolve, 20 has exited, 30 is fine.
    let system = mocksystem::Builder::new()
        .with_executables(&["pgrep", "ps", "jstat"])
        .with_users(vec![Account {
            name: "svc".to_string(),
            uid: 600,
            gid: 600,
        }])
        .with_outputs(map! {
            "pgrep java".to_string() => "10\n20\n30\n".to_string(),
            "ps -p 10 -o command=".to_string() => "java Ghost".to_string(),
            "ps -p 10 -o user=".to_string() => "ghost".to_string(),
            "ps -p 30 -o command=".to_string() => "java Svc".to_string(),
            "ps -p 30 -o user=".to_string() => "svc".to_string(),
            "jstat -gc 30".to_string() => "YGC FGC\n3 1\n".to_string(),
            "jstat -class 30".to_string() => "Loaded Bytes Unloaded Bytes Time\n10 20.0 0 0.0 0.1\n".to_string()
        })
        .freeze();
    let mut lines: Vec<String> = vec![];
    collect(
        &system,
        &RunOptions {
            environment: "staging".to_string(),
        },
        &mut |l| lines.push(l.to_string()),
    );
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(
        "application=jstatmon environment=staging option=-gc user=svc pid=30 command=java Svc "
    ));
    assert!(lines[0].ends_with(
        "gc_number_of_young_generation_GC_events=3 gc_number_of_stop_the_world_events=1"
    ));
    assert!(lines[1].contains("option=-class"));
    assert!(lines[1].contains("class_number_of_kBs_unloaded=0.0"));
    // jstat only ever ran for pid 30
    assert!(system.demotions().iter().all(|(c, _)| c.ends_with(" 30")));
    assert_eq!(system.demotions().len(), 5);
}

#[test]
pub fn test_exited_process_is_a_warning() {
    testlog::capture();
    // pgrep saw 42 but it was gone by the time ps looked.
    let system = mocksystem::Builder::new()
        .with_executables(&["pgrep", "ps", "jstat"])
        .with_outputs(map! { "pgrep java".to_string() => "42\n".to_string() })
        .freeze();
    let mut lines: Vec<String> = vec![];
    collect(&system, &prod(), &mut |l| lines.push(l.to_string()));
    assert!(lines.is_empty());
    assert!(system.demotions().is_empty());
    assert_eq!(testlog::count(log::Level::Error), 0);
    let warnings = testlog::records()
        .into_iter()
        .filter(|(level, msg)| *level == log::Level::Warn && msg.contains("pid=42"))
        .count();
    assert_eq!(warnings, 1);
}
