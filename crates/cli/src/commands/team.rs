// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Team record commands

use super::Env;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use std::fmt;
use ts_core::{AccessCode, TeamId, TeamRecord, TestId};
use ts_engine::{BarrierOutcome, ReadinessBarrier};

#[derive(Args)]
pub struct ShowArgs {
    /// Team id; lists all teams when omitted
    pub team: Option<TeamId>,
}

#[derive(Args)]
pub struct CodeArgs {
    /// Participant access code, e.g. s42p1
    pub code: AccessCode,
}

#[derive(Args)]
pub struct TeamArgs {
    /// Team id
    pub team: TeamId,
}

#[derive(Serialize)]
struct TeamSummary {
    team: TeamId,
    participants: usize,
    ready: usize,
    current_test: TestId,
    current_screen: u32,
}

impl fmt::Display for TeamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8} {:<12} {:<8} {}/{}",
            self.team.to_string(),
            self.current_test.name(),
            self.current_screen,
            self.ready,
            self.participants
        )
    }
}

#[derive(Serialize)]
struct TeamView {
    team: TeamId,
    #[serde(flatten)]
    record: TeamRecord,
}

fn list(set: &ts_core::ParticipantSet) -> String {
    let codes: Vec<_> = set.iter().map(ToString::to_string).collect();
    if codes.is_empty() {
        "-".to_string()
    } else {
        codes.join(", ")
    }
}

impl fmt::Display for TeamView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.record;
        let order: Vec<_> = r.tests_order.iter().map(TestId::name).collect();
        writeln!(f, "Team: {}", self.team)?;
        writeln!(f, "  Test: {} (screen {})", r.current_test, r.current_screen)?;
        writeln!(f, "  Participants: {}", list(&r.participants))?;
        writeln!(f, "  Ready: {}", list(&r.ready_to_start))?;
        writeln!(f, "  Next idea id: {}", r.idea_id)?;
        if let Some(start) = r.start_time {
            writeln!(f, "  Countdown: {} ms from {}", r.test_time, start)?;
        }
        if let Some(user) = &r.text_editing_user {
            writeln!(f, "  Title edited by: {}", user)?;
        }
        if let Some(creator) = &r.pic_con_bg_creator {
            writeln!(f, "  Background by: {}", creator)?;
        }
        writeln!(f, "  Demo stop timer: {}", r.demo_stop_timer)?;
        write!(f, "  Order: {}", order.join(" -> "))
    }
}

pub async fn show(env: &Env, args: ShowArgs, format: OutputFormat) -> Result<()> {
    let Some(team) = args.team else {
        let mut summaries = Vec::new();
        for team in env.store.teams().await? {
            if let Some(record) = env.store.get(team).await? {
                summaries.push(TeamSummary {
                    team,
                    participants: record.participants.len(),
                    ready: record.ready_to_start.len(),
                    current_test: record.current_test,
                    current_screen: record.current_screen,
                });
            }
        }
        if summaries.is_empty() && matches!(format, OutputFormat::Text) {
            println!("No teams");
        } else {
            if matches!(format, OutputFormat::Text) {
                println!("{:<8} {:<12} {:<8} READY", "TEAM", "TEST", "SCREEN");
            }
            output::print_list(&summaries, format)?;
        }
        return Ok(());
    };

    match env.store.get(team).await? {
        Some(record) => output::print(&TeamView { team, record }, format),
        None => bail!("team {} has no record", team),
    }
}

pub async fn join(env: &Env, args: CodeArgs, format: OutputFormat) -> Result<()> {
    let team = args.code.team_id();
    let record = env.store.ensure_participant(team, &args.code).await?;
    match format {
        OutputFormat::Text => println!(
            "Joined {} to team {} ({} participants)",
            args.code,
            team,
            record.participants.len()
        ),
        OutputFormat::Json => output::print(&TeamView { team, record }, format)?,
    }
    Ok(())
}

pub async fn leave(env: &Env, args: CodeArgs) -> Result<()> {
    let team = args.code.team_id();
    if env.store.remove_participant(team, &args.code).await? {
        println!("Removed {} from team {}", args.code, team);
    } else {
        println!("{} is not a member of team {}", args.code, team);
    }
    Ok(())
}

pub async fn ready(env: &Env, args: CodeArgs) -> Result<()> {
    let team = args.code.team_id();
    if env.store.get(team).await?.is_none() {
        bail!("team {} has no record", team);
    }

    let barrier = ReadinessBarrier::new(env.store.clone());
    match barrier.signal_ready(team, &args.code).await? {
        BarrierOutcome::Pending => {
            let record = env.store.get(team).await?;
            let (ready, total) = record.map_or((0, 0), |r| {
                (r.ready_to_start.len(), r.participants.len())
            });
            println!("Pending: {}/{} ready in team {}", ready, total, team);
        }
        _ => println!("Granted: team {} may proceed", team),
    }
    Ok(())
}

pub async fn reset(env: &Env, args: TeamArgs) -> Result<()> {
    if !env.store.reset(args.team).await? {
        bail!("team {} has no record", args.team);
    }
    println!("Reset team {}", args.team);
    Ok(())
}

pub async fn delete(env: &Env, args: TeamArgs) -> Result<()> {
    if !env.store.delete(args.team).await? {
        bail!("team {} has no record", args.team);
    }
    println!("Deleted team {}", args.team);
    Ok(())
}
