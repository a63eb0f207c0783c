use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn no_host_never_sends_commands() {
    let host = NoHost;
    assert_eq!(host.poll(), HostCommand::None);
    host.wait_resume();
    host.post_message("start,Main");
}

#[test]
fn commands_are_polled_in_order() {
    let queue = CommandQueue::new();
    queue.send(HostCommand::Pause);
    queue.send(HostCommand::Exit);
    assert_eq!(queue.poll(), HostCommand::Pause);
    assert_eq!(queue.poll(), HostCommand::Exit);
    assert_eq!(queue.poll(), HostCommand::None);
}

#[test]
fn resume_before_wait_is_not_lost() {
    let queue = CommandQueue::new();
    queue.resume();
    queue.wait_resume();
}

#[test]
fn wait_resume_blocks_until_another_thread_resumes() {
    let queue = Arc::new(CommandQueue::new());
    let remote = Arc::clone(&queue);
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        remote.resume();
    });
    queue.wait_resume();
    assert!(handle.join().is_ok());
}

#[test]
fn messages_are_recorded() {
    let queue = CommandQueue::new();
    queue.post_message("debug,pause");
    queue.post_message("debug,continue");
    assert_eq!(queue.messages(), vec!["debug,pause", "debug,continue"]);
}
