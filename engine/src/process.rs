use crate::uci::{format_command, parse_uci_message, UciMessage};
use crate::{EngineCommand, EngineError, EngineEvent, EngineInfo, GoParams, MoveProvider};
use cozy_chess::Move;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};

/// Default time to wait for `uciok` / `readyok`.
const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Extra time allowed past the search budget before a request is abandoned.
const DEFAULT_REPLY_GRACE: Duration = Duration::from_secs(5);

/// Configuration for launching and tuning the engine process.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine executable. Searched for when `None`.
    pub path: Option<PathBuf>,
    /// Extra command-line arguments for the executable.
    pub args: Vec<String>,
    pub skill_level: Option<u8>,
    pub threads: Option<u32>,
    pub hash_mb: Option<u32>,
    pub handshake_timeout: Duration,
    pub reply_grace: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: None,
            args: Vec::new(),
            skill_level: None,
            threads: None,
            hash_mb: None,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            reply_grace: DEFAULT_REPLY_GRACE,
        }
    }
}

impl EngineConfig {
    /// `setoption` commands implied by this configuration.
    pub fn option_commands(&self) -> Vec<EngineCommand> {
        let mut commands = Vec::new();
        if let Some(level) = self.skill_level {
            commands.push(EngineCommand::SetOption {
                name: "Skill Level".to_string(),
                value: Some(level.min(20).to_string()),
            });
        }
        if let Some(threads) = self.threads {
            commands.push(EngineCommand::SetOption {
                name: "Threads".to_string(),
                value: Some(threads.clamp(1, 16).to_string()),
            });
        }
        if let Some(hash_mb) = self.hash_mb {
            commands.push(EngineCommand::SetOption {
                name: "Hash".to_string(),
                value: Some(hash_mb.clamp(1, 2048).to_string()),
            });
        }
        commands
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingRequest {
    deadline: Instant,
    limit: Duration,
}

/// A running UCI engine process.
pub struct UciEngine {
    process: Child,
    stdin_tx: mpsc::Sender<String>,
    event_rx: mpsc::Receiver<EngineEvent>,
    name: Option<String>,
    pending: Option<PendingRequest>,
    latest_info: Option<EngineInfo>,
    reply_grace: Duration,
}

impl UciEngine {
    /// Launch the engine and complete the UCI handshake.
    #[tracing::instrument(level = "info")]
    pub async fn spawn(config: EngineConfig) -> Result<Self, EngineError> {
        let path = match &config.path {
            Some(path) => path.clone(),
            None => find_engine_path().ok_or(EngineError::NotFound)?,
        };
        tracing::info!("Launching UCI engine at {:?}", path);

        let mut process = tokio::process::Command::new(&path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                tracing::error!("Failed to spawn engine: {}", source);
                EngineError::Spawn {
                    path: path.clone(),
                    source,
                }
            })?;

        let mut stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Handshake("engine has no stdin".to_string()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Handshake("engine has no stdout".to_string()))?;

        let (event_tx, mut event_rx) = mpsc::channel::<EngineEvent>(64);
        let (stdin_tx, mut stdin_rx) = mpsc::channel::<String>(32);

        // Output reader task
        let reader_tx = event_tx.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        tracing::warn!("Engine stdout EOF - engine closed");
                        let _ = reader_tx
                            .send(EngineEvent::Error("engine closed its output".to_string()))
                            .await;
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        tracing::trace!("UCI << {}", trimmed);

                        let event = match parse_uci_message(trimmed) {
                            Ok(UciMessage::UciOk) | Ok(UciMessage::ReadyOk) => EngineEvent::Ready,
                            Ok(UciMessage::Id { name, value }) if name == "name" => {
                                EngineEvent::Identified(value)
                            }
                            Ok(UciMessage::BestMove { mv, .. }) => {
                                tracing::debug!("Received bestmove: {:?}", mv);
                                EngineEvent::BestMove(mv)
                            }
                            Ok(UciMessage::Info(info)) => EngineEvent::Info(info),
                            Ok(other) => {
                                tracing::trace!("Ignoring UCI message: {:?}", other);
                                continue;
                            }
                            Err(e) if trimmed.starts_with("bestmove") => {
                                EngineEvent::Error(format!("unreadable reply: {}", e))
                            }
                            Err(_) => {
                                tracing::trace!("Unparsed UCI line: {}", trimmed);
                                continue;
                            }
                        };

                        if reader_tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Error reading from engine stdout: {}", e);
                        let _ = reader_tx
                            .send(EngineEvent::Error(format!("read failed: {}", e)))
                            .await;
                        break;
                    }
                }
            }
            tracing::debug!("Output reader task exiting");
        });

        // Stdin writer task
        let writer_tx = event_tx;
        tokio::spawn(async move {
            while let Some(cmd) = stdin_rx.recv().await {
                tracing::trace!("UCI >> {}", cmd.trim());
                let written = match stdin.write_all(cmd.as_bytes()).await {
                    Ok(()) => stdin.flush().await,
                    Err(e) => Err(e),
                };
                if let Err(e) = written {
                    tracing::error!("Failed to write to engine stdin: {}", e);
                    let _ = writer_tx
                        .send(EngineEvent::Error(format!("write failed: {}", e)))
                        .await;
                    break;
                }
            }
            tracing::debug!("Stdin writer task exiting");
        });

        let mut name = None;

        send(&stdin_tx, &EngineCommand::Uci).await?;
        wait_until_ready(&mut event_rx, config.handshake_timeout, &mut name).await?;

        for option in config.option_commands() {
            tracing::info!("Configuring engine: {}", format_command(&option).trim());
            send(&stdin_tx, &option).await?;
        }

        send(&stdin_tx, &EngineCommand::NewGame).await?;
        send(&stdin_tx, &EngineCommand::IsReady).await?;
        wait_until_ready(&mut event_rx, config.handshake_timeout, &mut name).await?;

        tracing::info!(
            engine = name.as_deref().unwrap_or("unknown"),
            "UCI engine ready"
        );
        Ok(Self {
            process,
            stdin_tx,
            event_rx,
            name,
            pending: None,
            latest_info: None,
            reply_grace: config.reply_grace,
        })
    }

    /// Engine name reported during the handshake.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn try_send(&self, cmd: &EngineCommand) -> Result<(), EngineError> {
        self.stdin_tx
            .try_send(format_command(cmd))
            .map_err(|e| match e {
                TrySendError::Full(_) => EngineError::Busy,
                TrySendError::Closed(_) => EngineError::Closed,
            })
    }

    /// Shutdown the engine
    pub async fn shutdown(mut self) {
        tracing::info!("Shutting down engine");
        let _ = send(&self.stdin_tx, &EngineCommand::Quit).await;
        if tokio::time::timeout(Duration::from_secs(1), self.process.wait())
            .await
            .is_err()
        {
            tracing::warn!("Engine ignored quit, killing it");
            let _ = self.process.kill().await;
        }
    }
}

impl MoveProvider for UciEngine {
    fn request_move(&mut self, fen: &str, budget: Duration) -> Result<(), EngineError> {
        if self.pending.is_some() {
            return Err(EngineError::Busy);
        }
        if let Ok(Some(status)) = self.process.try_wait() {
            return Err(EngineError::Disconnected(format!("engine exited ({})", status)));
        }

        // Drop replies left over from an abandoned search.
        loop {
            match self.event_rx.try_recv() {
                Ok(EngineEvent::Error(msg)) => return Err(EngineError::Disconnected(msg)),
                Ok(stale) => tracing::debug!("Discarding stale engine event: {:?}", stale),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(EngineError::Closed),
            }
        }

        let movetime = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX).max(1);
        tracing::info!("Requesting engine move: movetime={}ms fen={}", movetime, fen);
        self.try_send(&EngineCommand::SetPosition {
            fen: fen.to_string(),
            moves: Vec::new(),
        })?;
        self.try_send(&EngineCommand::Go(GoParams {
            movetime: Some(movetime),
        }))?;

        let limit = budget + self.reply_grace;
        self.pending = Some(PendingRequest {
            deadline: Instant::now() + limit,
            limit,
        });
        self.latest_info = None;
        Ok(())
    }

    fn poll_move(&mut self) -> Option<Result<Move, EngineError>> {
        let pending = self.pending?;

        loop {
            match self.event_rx.try_recv() {
                Ok(EngineEvent::BestMove(Some(mv))) => {
                    self.pending = None;
                    return Some(Ok(mv));
                }
                Ok(EngineEvent::BestMove(None)) => {
                    self.pending = None;
                    return Some(Err(EngineError::NoMove));
                }
                Ok(EngineEvent::Info(info)) => {
                    if info.has_progress() {
                        self.latest_info = Some(info);
                    }
                }
                Ok(EngineEvent::Error(msg)) => {
                    self.pending = None;
                    return Some(Err(EngineError::Disconnected(msg)));
                }
                Ok(EngineEvent::Ready) | Ok(EngineEvent::Identified(_)) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.pending = None;
                    return Some(Err(EngineError::Closed));
                }
            }
        }

        if Instant::now() >= pending.deadline {
            tracing::warn!("Engine missed its deadline of {:?}", pending.limit);
            self.pending = None;
            let _ = self.try_send(&EngineCommand::Stop);
            return Some(Err(EngineError::Timeout(pending.limit)));
        }
        None
    }

    fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    fn latest_info(&self) -> Option<&EngineInfo> {
        self.latest_info.as_ref()
    }
}

async fn send(stdin_tx: &mpsc::Sender<String>, cmd: &EngineCommand) -> Result<(), EngineError> {
    stdin_tx
        .send(format_command(cmd))
        .await
        .map_err(|_| EngineError::Closed)
}

async fn wait_until_ready(
    event_rx: &mut mpsc::Receiver<EngineEvent>,
    timeout: Duration,
    name: &mut Option<String>,
) -> Result<(), EngineError> {
    let waited = tokio::time::timeout(timeout, async {
        while let Some(event) = event_rx.recv().await {
            match event {
                EngineEvent::Ready => return Ok(()),
                EngineEvent::Identified(id) => *name = Some(id),
                EngineEvent::Error(msg) => return Err(EngineError::Handshake(msg)),
                _ => {}
            }
        }
        Err(EngineError::Handshake(
            "engine closed before becoming ready".to_string(),
        ))
    })
    .await;

    match waited {
        Ok(result) => result,
        Err(_) => Err(EngineError::Handshake(format!(
            "no reply within {:?}",
            timeout
        ))),
    }
}

/// Find a Stockfish executable in common locations or on `$PATH`.
pub fn find_engine_path() -> Option<PathBuf> {
    let known = [
        "/usr/local/bin/stockfish",
        "/usr/bin/stockfish",
        "/opt/homebrew/bin/stockfish",
        "/usr/games/stockfish",
    ];
    if let Some(found) = known.iter().map(Path::new).find(|p| p.is_file()) {
        return Some(found.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .flat_map(|dir| [dir.join("stockfish"), dir.join("stockfish.exe")])
        .find(|candidate| candidate.is_file())
}
