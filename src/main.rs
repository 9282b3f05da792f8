//! Lumen - 命令行入口
//!
//! 初始化日志与配置，创建助手，在标准输入上运行一个简单的会话循环。
//! 指令：`/tier fast|detailed|advanced` 切换层级，`/thinking` 切换思考过程显示，`/quit` 退出。

use anyhow::Context;
use lumen::cascade::{SideChannel, Tier};
use lumen::config::load_config;
use lumen::finalizer::StyleSettings;
use lumen::memory::{ConversationMemory, Message};
use lumen::{observability, Assistant, AssistantReply, AssistantRequest};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

fn print_reply(reply: &AssistantReply) {
    if let Some(ref thinking) = reply.thinking {
        println!("{thinking}");
    }
    println!("{}", reply.result.text);
    if let Some(SideChannel::Chart(ref chart)) = reply.result.side_channel {
        println!(
            "[chart] {} ({}): {:?} {:?}",
            chart.title,
            chart.kind.as_str(),
            chart.labels,
            chart.data
        );
    }
    if !reply.result.sources.is_empty() {
        println!("sources: {}", reply.result.sources.join(", "));
    }
    println!(
        "({} · {} · confidence {:.2})",
        reply.tier, reply.handler, reply.result.confidence
    );
    for suggestion in &reply.suggestions {
        println!("  → {suggestion}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let mut tier = Tier::parse_or_default(&cfg.app.default_tier);
    let mut style = StyleSettings {
        enabled: cfg.style.enabled,
    };
    let mut include_thinking = false;
    let mut memory = ConversationMemory::new(cfg.app.max_context_turns);
    let assistant = Assistant::from_config(cfg);

    let session_id = format!("session_{}", uuid::Uuid::new_v4());
    info!(session = %session_id, tier = %tier, "session started");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(format!("[{tier}] > ").as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let input = line.trim();

        if input == "/quit" || input == "/exit" {
            break;
        }
        if let Some(name) = input.strip_prefix("/tier") {
            tier = Tier::parse_or_default(name);
            println!("tier: {tier}");
            continue;
        }
        if input == "/thinking" {
            include_thinking = !include_thinking;
            println!("thinking: {}", if include_thinking { "on" } else { "off" });
            continue;
        }

        let request = AssistantRequest::new(input)
            .with_tier(tier)
            .with_style(style)
            .with_thinking(include_thinking);
        let reply = assistant.respond(&request, &memory).await;

        if let Some(SideChannel::StyleToggle { enabled }) = reply.result.side_channel {
            style.enabled = enabled;
        }
        memory.push(Message::user(input));
        memory.push(Message::assistant(reply.result.text.clone()));
        print_reply(&reply);
    }

    info!(session = %session_id, turns = memory.len(), "session ended");
    Ok(())
}
