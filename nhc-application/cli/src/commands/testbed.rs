//! Testbed 命令处理

use anyhow::{Context, Result};
use colored::Colorize;

use nhc_topology::{CheckConfig, Testbed};

use crate::config::CliConfig;

pub async fn handle(action: crate::TestbedAction) -> Result<()> {
    match action {
        crate::TestbedAction::Show { testbed } => show(testbed).await,
        crate::TestbedAction::Validate { testbed, checks } => validate(testbed, checks).await,
    }
}

async fn show(testbed: Option<String>) -> Result<()> {
    let config = CliConfig::load()?;
    let path = config.resolve_testbed(testbed);

    let testbed =
        Testbed::from_yaml_file(&path).with_context(|| format!("加载测试床失败: {}", path))?;

    println!("测试床: {}", testbed.name.cyan().bold());
    println!("设备数: {}", testbed.devices.len().to_string().yellow());
    println!();
    for (name, device) in &testbed.devices {
        let os = device
            .os
            .as_deref()
            .map(|os| format!(" ({})", os))
            .unwrap_or_default();
        println!(
            "  {} {}:{}{}",
            name.cyan(),
            device.host,
            device.port,
            os.bright_black()
        );
    }
    Ok(())
}

async fn validate(testbed: Option<String>, checks: Option<String>) -> Result<()> {
    let config = CliConfig::load()?;
    let testbed_path = config.resolve_testbed(testbed);
    let checks_path = config.resolve_checks(checks);

    let testbed = Testbed::from_yaml_file(&testbed_path)
        .with_context(|| format!("加载测试床失败: {}", testbed_path))?;
    testbed.validate().context("测试床校验失败")?;

    let check_config = CheckConfig::from_yaml_file(&checks_path)
        .with_context(|| format!("加载检查配置失败: {}", checks_path))?;
    check_config.validate().context("检查配置校验失败")?;

    println!("{} 测试床与检查配置有效", "✓".green().bold());
    println!("设备: {}", testbed.device_names().join(", "));
    println!("接口: {}", check_config.interfaces.join(", "));
    println!("目的地址: {}", check_config.destinations.join(", "));
    Ok(())
}
