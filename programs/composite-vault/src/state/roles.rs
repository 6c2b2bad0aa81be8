use anchor_lang::prelude::*;

/// Explicit capability object for one vault: governance owns parameter and
/// controller changes, the strategist owns allocation, the harvester may
/// trigger harvests. Checked by account constraints on the signing key.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct Roles {
    pub vault: Pubkey,
    pub governance: Pubkey,
    pub strategist: Pubkey,
    pub harvester: Pubkey,
}

impl Roles {
    pub fn init(
        &mut self,
        vault: Pubkey,
        governance: Pubkey,
        strategist: Pubkey,
        harvester: Pubkey,
    ) -> Result<()> {
        self.vault = vault;
        self.governance = governance;
        self.strategist = strategist;
        self.harvester = harvester;
        Ok(())
    }
}
