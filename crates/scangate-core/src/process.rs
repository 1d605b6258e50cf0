//! 外部进程调用（一次调用 = 一个 ProcessResult）
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::error::ScanError;

/// 单次外部调用的结果（创建后不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// 退出码；被信号终止时为 -1
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
    /// 与 status 独立保存
    pub success: bool,
}

impl ProcessResult {
    /// 按退出码构造（success = status == 0），主要用于测试与回放
    pub fn new(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self { status, stdout: stdout.into(), stderr: stderr.into(), success: status == 0 }
    }
}

/// 待执行的工具命令行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    /// 环境变量覆盖（在继承的环境之上追加）
    pub env: BTreeMap<String, String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), env: BTreeMap::new() }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// 便于日志输出的命令行文本
    pub fn display(&self) -> String {
        let mut s = self.program.clone();
        for a in &self.args {
            s.push(' ');
            s.push_str(a);
        }
        s
    }
}

/// 进程执行器：非零退出码属于正常结果，只有启动/等待失败才返回 Err
pub trait ProcessRunner: Send + Sync {
    fn run(&self, cmd: &ToolCommand, dir: &Path) -> Result<ProcessResult, ScanError>;
}

/// 基于 std::process::Command 的默认实现（完整捕获，不做流式读取）
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ProcessRunner for ShellRunner {
    fn run(&self, cmd: &ToolCommand, dir: &Path) -> Result<ProcessResult, ScanError> {
        info!(command = %cmd.display(), dir = %dir.display(), "running tool");

        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .envs(&cmd.env)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ScanError::Spawn { program: cmd.program.clone(), source })?;

        let result = ProcessResult {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        };
        debug!(
            program = %cmd.program,
            status = result.status,
            stdout_len = result.stdout.len(),
            stderr_len = result.stderr.len(),
            "tool finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_success_from_status() {
        assert!(ProcessResult::new(0, "", "").success);
        assert!(!ProcessResult::new(3, "", "").success);
    }

    #[test]
    fn command_display_joins_args() {
        let cmd = ToolCommand::new("gosec").arg("-fmt=json").arg("./...");
        assert_eq!(cmd.display(), "gosec -fmt=json ./...");
    }

    #[cfg(unix)]
    #[test]
    fn shell_runner_captures_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ToolCommand::new("sh")
            .arg("-c")
            .arg("echo out; echo err >&2; echo \"$SCANGATE_TEST\"; exit 3")
            .env("SCANGATE_TEST", "yes");
        let res = ShellRunner.run(&cmd, dir.path()).unwrap();
        assert_eq!(res.status, 3);
        assert!(!res.success);
        assert_eq!(res.stdout, "out\nyes\n");
        assert_eq!(res.stderr, "err\n");
    }

    #[test]
    fn shell_runner_reports_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ToolCommand::new("scangate-definitely-missing-binary");
        let err = ShellRunner.run(&cmd, dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::Spawn { .. }));
    }
}
