//
//  gocd-cli
//  cli/version.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `gocd version`: the version of the server, not of this tool.

use anyhow::Result;

use crate::api::Version;
use crate::output::{print_field, print_header, OutputWriter, TableOutput};

use super::GlobalOptions;

impl TableOutput for Version {
    fn print_table(&self, color: bool) {
        print_header("GoCD server");
        print_field("Version", &self.version, color);
        print_field("Build", &self.build_number, color);
        print_field("Commit", &self.git_sha, color);
        if !self.commit_url.is_empty() {
            print_field("URL", &self.commit_url, color);
        }
    }
}

pub(super) async fn run(global: &GlobalOptions) -> Result<()> {
    let mut client = global.client()?;
    let version = client.version().await?;
    OutputWriter::new(global.format()).write(&version)
}
