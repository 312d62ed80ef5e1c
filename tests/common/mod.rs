#![allow(dead_code)]

//! A scripted device on the far end of an in-memory pipe.
//!
//! Answers each incoming command with the configured response lines, the
//! way a receiver echoes values back; commands not in the script get
//! `@UNDEFINED`, like probing a function the device does not have.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::task::JoinHandle;

pub type Script = Vec<((&'static str, &'static str), Vec<&'static str>)>;

pub struct ScriptedDevice {
    /// Every command line the device received, in order.
    pub received: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl ScriptedDevice {
    pub fn spawn(stream: DuplexStream, script: Script) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();
        let task = tokio::spawn(async move {
            let (read, mut write) = tokio::io::split(stream);
            let mut lines = BufReader::new(read).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let line = line.trim_end_matches('\r').to_string();
                log.lock().unwrap().push(line.clone());

                let Some(body) = line.strip_prefix('@') else {
                    continue;
                };
                let Some((address, _)) = body.split_once('=') else {
                    continue;
                };
                let Some((subunit, function)) = address.split_once(':') else {
                    continue;
                };

                let responses = script
                    .iter()
                    .find(|((s, f), _)| *s == subunit && *f == function)
                    .map(|(_, responses)| responses.clone())
                    .unwrap_or_else(|| vec!["@UNDEFINED"]);
                for response in responses {
                    let framed = format!("{response}\r\n");
                    if write.write_all(framed.as_bytes()).await.is_err() {
                        return;
                    }
                }
            }
        });
        Self { received, task }
    }

    pub fn sent_lines(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

/// Poll until `condition` holds, giving the background tasks time to run.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition never became true");
}
