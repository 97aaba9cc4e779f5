use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;
use wallet_core::config::{load_wallet_record, locate_wallet_file};
use wallet_core::{
    format_oct, HttpRpcClient, TransferProtocol, WalletAccount, WalletConfig, WalletError,
    WalletRecord, TRANSFER_AMOUNT_RAW,
};

pub fn generate(output: Option<&Path>, force: bool) -> Result<()> {
    let record = wallet_core::generate_wallet()?;
    let json = serde_json::to_string_pretty(&record)?;

    if let Some(path) = output {
        write_wallet_file(path, &json, force)?;
        info!(path = %path.display(), address = %record.address, "wallet saved");
    }
    println!("{json}");
    Ok(())
}

pub async fn balance(wallet: Option<&Path>, rpc: Option<String>) -> Result<()> {
    let (account, config) = open_wallet(wallet, rpc)?;
    let protocol = TransferProtocol::with_config(HttpRpcClient::new(&config)?, &config);

    let status = protocol.status(account.address()).await?;
    println!("address: {}", account.address());
    println!("balance: {} OCT", format_oct(status.balance));
    println!("nonce:   {}", status.nonce);
    Ok(())
}

pub async fn send(wallet: Option<&Path>, rpc: Option<String>, to: &str) -> Result<()> {
    let (account, config) = open_wallet(wallet, rpc)?;
    let protocol = TransferProtocol::with_config(HttpRpcClient::new(&config)?, &config);

    println!(
        "sending {} OCT from {} to {}",
        format_oct(TRANSFER_AMOUNT_RAW),
        account.address(),
        to.trim()
    );
    match protocol.send(&account, to).await {
        Ok(receipt) => {
            println!("accepted: {}", receipt.tx_hash);
            Ok(())
        }
        Err(WalletError::Rejected(payload)) => {
            bail!("rejected by node: {payload}")
        }
        Err(e) => Err(e.into()),
    }
}

fn open_wallet(
    wallet: Option<&Path>,
    rpc: Option<String>,
) -> Result<(WalletAccount, WalletConfig)> {
    let path = locate_wallet_file(wallet)?;
    let record = load_wallet_record(&path)?;
    let account = WalletAccount::from_record(&record)
        .with_context(|| format!("invalid wallet file {}", path.display()))?;
    Ok((account, config_for(&record, rpc)))
}

fn config_for(record: &WalletRecord, rpc: Option<String>) -> WalletConfig {
    let config = WalletConfig::for_record(record);
    match rpc.filter(|url| !url.trim().is_empty()) {
        Some(url) => config.with_rpc_url(url.trim()),
        None => config,
    }
}

fn write_wallet_file(path: &Path, json: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
