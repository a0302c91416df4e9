//! 运行报告输出格式化

use colored::{ColoredString, Colorize};

use nhc_common::{RunReport, TestStatus};

/// 状态着色显示
pub fn colorize_status(status: TestStatus) -> ColoredString {
    match status {
        TestStatus::Passed => status.display_name().green().bold(),
        TestStatus::Skipped => status.display_name().yellow(),
        TestStatus::Failed => status.display_name().red().bold(),
        TestStatus::Errored => status.display_name().magenta().bold(),
    }
}

/// 打印完整运行报告
pub fn print_report(report: &RunReport) {
    println!();
    println!("{}", "========================================".bright_black());
    println!("运行: {}", report.name.cyan().bold());
    println!("结论: {}", colorize_status(report.status));
    println!("实例: {}/{} 通过", report.passed_count(), report.testcases.len());
    println!("总耗时: {} ms", report.duration_ms);
    println!("{}", "========================================".bright_black());

    if let Some(common) = &report.common_setup {
        println!();
        println!(
            "[{}] {}",
            common.kind.display_name(),
            colorize_status(common.status)
        );
        for step in &common.steps {
            println!(
                "  {} {} - {}",
                step.status.glyph(),
                step.name,
                step.message.bright_black()
            );
        }
    }

    for case in &report.testcases {
        println!();
        println!(
            "{} {} - {}",
            case.status.glyph(),
            case.name.cyan(),
            colorize_status(case.status)
        );
        if let Some(message) = &case.message {
            println!("  {}", message.bright_black());
        }
        for phase in &case.phases {
            println!(
                "  [{}] {}",
                phase.kind.display_name(),
                colorize_status(phase.status)
            );
            if let Some(message) = &phase.message {
                println!("    {}", message.bright_black());
            }
            for step in &phase.steps {
                println!(
                    "    {} {} - {}",
                    step.status.glyph(),
                    step.name,
                    step.message.bright_black()
                );
            }
        }
    }
    println!();
}
