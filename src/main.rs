/*
 * Created on Mon Jan 12 2026
 *
 * This file is a part of ddbd
 * ddbd is the secure client-server messaging core of an industrial
 * drawing-database application: connection handshake, wire framing,
 * request dispatch and the typed component catalog.
 *
 * Copyright (c) 2026, the ddbd authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! Entry point: parse the CLI, load `serverMeta.json`, stand up logging and
//! identity key material, then drive the dispatcher's tick loop until told
//! to stop (§4.4, §6, §7's fatal-error policy layer).

use ddbd::config::{self, Cli};
use ddbd::crypto::jwt::JwksKeySet;
use ddbd::crypto::rsa::KeyPair;
use ddbd::crypto::SignatureKeyPair;
use ddbd::db::NullRowSource;
use ddbd::dbnet::listener::HandshakeMaterial;
use ddbd::dbnet::repeat_token::RepeatTokenTable;
use ddbd::dbnet::Dispatcher;
use ddbd::logging::{Logger, Sink};
use ddbd::request::Router;
use std::sync::Arc;

fn main() {
    let cli = Cli::parse_or_exit();

    let log_level = if cli.dev { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let meta = match config::load_server_meta(&cli.meta) {
        Ok(meta) => meta,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let logger = match build_logger(&meta) {
        Ok(logger) => logger,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let server_identity = match std::fs::read(&meta.key_path).map_err(ddbd::util::Error::from).and_then(|pem| KeyPair::from_pem(&pem)) {
        Ok(key) => key,
        Err(e) => {
            logger.error(&format!("could not load server identity key from {}: {e}", meta.key_path.display()), false);
            unreachable!("Logger::error with safe=false always exits");
        }
    };

    // The signature keypair's persistence and the identity provider's JWKS
    // discovery are both out of scope (§1): a production deployment wires
    // these in from its own key-management and OAuth setup. Generating a
    // fresh signature keypair per run is sound since it's only ever checked
    // against signatures this same process issues.
    let signature_keys = match SignatureKeyPair::generate() {
        Ok(keys) => keys,
        Err(e) => {
            logger.error(&format!("could not generate signature keypair: {e}"), false);
            unreachable!("Logger::error with safe=false always exits");
        }
    };

    let material = HandshakeMaterial {
        server_identity,
        signature_keys,
        app_id: cli.user.clone().unwrap_or_default(),
        jwks: JwksKeySet::new(),
    };

    let repeat_tokens = Arc::new(RepeatTokenTable::new());
    let router = Router::new(Arc::clone(&repeat_tokens), NullRowSource, meta.backup_path.clone());

    let mut dispatcher = match Dispatcher::new(&meta, material, router, repeat_tokens) {
        Ok(d) => d,
        Err(e) => {
            logger.error(&format!("failed to bind listening socket: {e:?}"), false);
            unreachable!("Logger::error with safe=false always exits");
        }
    };

    logger.log.write_line(&format!("server started on port {}", meta.server_port));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            logger.error(&format!("failed to start async runtime: {e}"), false);
            unreachable!("Logger::error with safe=false always exits");
        }
    };

    runtime.block_on(async {
        while dispatcher.is_running() {
            if let Err(e) = dispatcher.tick().await {
                logger.error.write_line(&format!("tick error: {e}"));
                log::error!("{e}");
            }
        }
    });

    logger.log.write_line("server shut down");
}

fn build_logger(meta: &ddbd::config::ServerMeta) -> ddbd::util::DdbResult<Logger> {
    let open_or_disabled = |path: &Option<std::path::PathBuf>| match path {
        Some(p) => Sink::open(p),
        None => Ok(Sink::disabled()),
    };
    Ok(Logger::new(
        open_or_disabled(&meta.log_file)?,
        open_or_disabled(&meta.changelog_file)?,
        open_or_disabled(&meta.error_file)?,
    ))
}
