//! `start_process`

use host_platform::{error_field, number_field, HostValue};
use log::debug;
use serde_json::Map;

use crate::attr::ProcAttr;
use crate::env::{split_env_pairs, to_host_env};
use crate::error::{map_host_error, PosixError, Result};
use crate::process::ProcessControl;
use crate::{Handle, Pid};

impl ProcessControl {
    /// Spawn `name` with `argv` and `attr`
    ///
    /// Returns the new pid and a handle that is always `0`; the pid is the only
    /// handle. Does not wait for the process.
    ///
    /// # Errors
    /// - the working directory cannot be resolved (no host spawn is issued)
    /// - the host reports a spawn error
    /// - the host reply carries no positive pid
    pub fn start_process(
        &self,
        name: &str,
        argv: &[String],
        attr: &ProcAttr,
    ) -> Result<(Pid, Handle)> {
        // The host always gets a program name, even for an empty argv
        let fallback;
        let argv = if argv.is_empty() {
            fallback = [name.to_string()];
            &fallback[..]
        } else {
            argv
        };

        let cwd = if attr.dir.is_empty() {
            self.fs.getwd().map_err(map_host_error)?
        } else {
            attr.dir.clone()
        };

        let env = match &attr.env {
            Some(env) => split_env_pairs(env),
            None => split_env_pairs(&self.fs.environ()),
        };

        let args: Vec<HostValue> = argv[1..].iter().cloned().map(HostValue::String).collect();

        let mut options = Map::new();
        if self.config.forward_argv0 {
            options.insert("argv0".to_string(), HostValue::String(argv[0].clone()));
        }
        options.insert("cwd".to_string(), HostValue::String(cwd));
        options.insert("env".to_string(), to_host_env(env));
        options.insert("stdio".to_string(), HostValue::Array(attr.files.clone()));

        debug!("spawn `{}` with {} arg(s)", name, args.len());
        let reply = self.host.spawn(name, args, HostValue::Object(options));

        if let Some(error) = error_field(&reply, "error") {
            debug!("spawn `{}` failed: {}", name, error);
            return Err(map_host_error(error));
        }

        let pid = number_field(&reply, "pid")
            .filter(|pid| *pid > 0)
            .and_then(|pid| Pid::try_from(pid).ok())
            .ok_or_else(|| PosixError::InvalidReply {
                operation: "spawn",
                reason: format!("no usable pid in {reply}"),
            })?;

        debug!("spawned `{}` as pid {}", name, pid);
        Ok((pid, 0))
    }
}
