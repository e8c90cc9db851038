use anchor_lang::prelude::*;

/// Registry account body (after the 8 byte discriminator)
/// Points at whichever lending program and pool are current
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LendingRegistry {
    pub lending_program: Pubkey,
    pub lending_pool: Pubkey,
}

impl LendingRegistry {
    pub const LEN: usize = 8 + // discriminator
        32 + // lending_program
        32; // lending_pool
}

/// Resolved lending entry point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    pub program_id: Pubkey,
    pub pool: Pubkey,
}

impl EntryPoint {
    /// Address token approvals are granted to
    pub fn spender(&self) -> Pubkey {
        self.pool
    }
}

impl From<LendingRegistry> for EntryPoint {
    fn from(registry: LendingRegistry) -> Self {
        Self {
            program_id: registry.lending_program,
            pool: registry.lending_pool,
        }
    }
}
