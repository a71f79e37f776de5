// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test order preview

use crate::output::{self, OutputFormat};
use clap::Args;
use serde::Serialize;
use std::fmt;
use ts_core::{Catalog, SyncConfig, TeamId, TestId};

#[derive(Args)]
pub struct OrderArgs {
    /// Team id
    pub team: TeamId,
}

#[derive(Serialize)]
struct TeamOrder {
    team: TeamId,
    order: Vec<TestId>,
}

impl fmt::Display for TeamOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.order.iter().map(TestId::name).collect();
        write!(f, "{}", names.join(" -> "))
    }
}

pub fn handle(args: &OrderArgs, config: &SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = Catalog::standard()?;
    let order = config
        .test_order
        .order_for(args.team, catalog.canonical_order());
    output::print(
        &TeamOrder {
            team: args.team,
            order,
        },
        format,
    )
}
