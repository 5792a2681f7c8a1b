use std::fs;

use swale_log::{HostChannel, LogConfig, RunLog, HOST_MESSAGE_LIMIT};

#[derive(Default)]
struct Recorder {
    posts: Vec<String>,
}

impl HostChannel for &mut Recorder {
    fn post(&mut self, message: &str) {
        self.posts.push(message.to_string());
    }
}

#[test]
fn lines_are_timestamped_and_appended() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig::new(dir.path().join("Script_Log.log"));
    let mut recorder = Recorder::default();
    {
        let mut log = RunLog::with_channel(&config, &mut recorder).unwrap();
        log.message("Starting MS4_Hub_prep").unwrap();
        log.message("Copying from source to temp").unwrap();
    }

    let contents = fs::read_to_string(&config.path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" - Starting MS4_Hub_prep"));
    assert!(lines[1].ends_with(" - Copying from source to temp"));
    // "MM/DD/YY HH:MM:SS - " prefix.
    assert_eq!(lines[0].find(" - "), Some(17));

    assert_eq!(
        recorder.posts,
        vec!["Starting MS4_Hub_prep", "Copying from source to temp"]
    );
}

#[test]
fn reopening_appends_rather_than_truncating() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig::new(dir.path().join("Script_Log.log"));
    let mut recorder = Recorder::default();

    RunLog::with_channel(&config, &mut recorder)
        .unwrap()
        .message("first run")
        .unwrap();
    RunLog::with_channel(&config, &mut recorder)
        .unwrap()
        .message("second run")
        .unwrap();

    let contents = fs::read_to_string(&config.path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn host_channel_gets_the_truncated_form_but_the_file_gets_everything() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig::new(dir.path().join("Script_Log.log"));
    let long = "y".repeat(HOST_MESSAGE_LIMIT + 200);

    let mut recorder = Recorder::default();
    RunLog::with_channel(&config, &mut recorder)
        .unwrap()
        .message(&long)
        .unwrap();

    assert_eq!(recorder.posts.len(), 1);
    assert_eq!(recorder.posts[0].len(), HOST_MESSAGE_LIMIT);

    let contents = fs::read_to_string(&config.path).unwrap();
    assert!(contents.trim_end().ends_with(&long));
}

#[test]
fn missing_parent_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig::new(dir.path().join("build").join("Swsp.Build.log"));
    let mut recorder = Recorder::default();
    RunLog::with_channel(&config, &mut recorder)
        .unwrap()
        .message("build log override")
        .unwrap();
    assert!(config.path.exists());
}
