//! Run 命令处理

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use nhc_checks::{device_manager_from_testbed, InterfaceCheck, ReachabilityCheck, RunPrecheck};
use nhc_engine::TestRunner;
use nhc_notifier::{status_lines, WebexNotifier};
use nhc_topology::{CheckConfig, Testbed};

use crate::config::CliConfig;

pub async fn handle(
    testbed: Option<String>,
    checks: Option<String>,
    name: String,
    output: Option<String>,
    notify: bool,
) -> Result<()> {
    let config = CliConfig::load()?;
    let testbed_path = config.resolve_testbed(testbed);
    let checks_path = config.resolve_checks(checks);

    // 加载测试床与检查配置
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("加载测试床: {}", testbed_path));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let testbed = Arc::new(
        Testbed::from_yaml_file(&testbed_path)
            .with_context(|| format!("加载测试床失败: {}", testbed_path))?,
    );
    let check_config = CheckConfig::from_yaml_file(&checks_path)
        .with_context(|| format!("加载检查配置失败: {}", checks_path))?;

    spinner.finish_with_message(format!(
        "{} 测试床加载成功: {} ({} 台设备)",
        "✓".green().bold(),
        testbed.name.cyan(),
        testbed.devices.len()
    ));

    // 非法的期望状态不中断运行: 对应检查项会在校验步骤记录失败结论
    if let Err(e) = check_config.validate() {
        eprintln!("{} {}", "警告:".yellow().bold(), e);
    }

    // 构建设备管理器与运行器
    let devices = Arc::new(device_manager_from_testbed(&testbed));
    let device_values: Vec<Value> = testbed
        .device_names()
        .into_iter()
        .map(Value::String)
        .collect();

    let mut runner =
        TestRunner::new().with_common_setup(Arc::new(RunPrecheck::new(Arc::clone(&testbed))));

    if !check_config.destinations.is_empty() {
        runner.register(Arc::new(ReachabilityCheck::new(
            Arc::clone(&devices),
            check_config.destinations.clone(),
        )));
        runner.mark_loop(ReachabilityCheck::NAME, "device", device_values.clone());
    }
    if !check_config.interfaces.is_empty() {
        runner.register(Arc::new(InterfaceCheck::new(
            Arc::clone(&devices),
            check_config.interfaces.clone(),
            &check_config.expected_status,
        )));
        runner.mark_loop(InterfaceCheck::NAME, "device", device_values.clone());
    }

    // 执行运行
    println!();
    println!("开始执行: {}", name.cyan().bold());
    let report = runner.run(&name).await;

    // 打印报告
    super::output::print_report(&report);

    // 导出 JSON 报告
    if let Some(output_path) = output {
        std::fs::write(&output_path, report.to_json()?)
            .with_context(|| format!("写入报告失败: {}", output_path))?;
        println!("报告已写入: {}", output_path.cyan());
    }

    // 发送 Webex 通知
    if notify {
        match WebexNotifier::from_env() {
            Ok(notifier) => {
                let node = report.to_node();
                let lines = status_lines(&node);
                let title = format!("{} network health check", report.name);
                match notifier.send_status_update(&title, &lines).await {
                    Ok(()) => println!("{} Webex 通知已发送", "✓".green().bold()),
                    Err(e) => eprintln!("{} Webex 通知发送失败: {}", "✗".red().bold(), e),
                }
            }
            Err(e) => eprintln!("{} 跳过通知: {}", "!".yellow().bold(), e),
        }
    }

    // 运行未通过时以非零码退出
    if report.status.is_problem() {
        std::process::exit(1);
    }
    Ok(())
}
