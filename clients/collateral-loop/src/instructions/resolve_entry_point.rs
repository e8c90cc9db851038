use anchor_lang::prelude::*;
use crate::errors::LoopError;
use crate::roles::Registry;
use crate::state::EntryPoint;

/// Look up the current lending entry point through the registry
/// The entry point can move; only the registry address is configuration
pub fn handler<R: Registry + ?Sized>(registry: &R, registry_address: &Pubkey) -> Result<EntryPoint> {
    let entry_point = registry.resolve_entry_point(registry_address)?;

    require_keys_neq!(
        entry_point.program_id,
        Pubkey::default(),
        LoopError::InvalidRegistry
    );
    require_keys_neq!(
        entry_point.pool,
        Pubkey::default(),
        LoopError::InvalidRegistry
    );

    msg!(
        "Lending pool {} (program {})",
        entry_point.pool,
        entry_point.program_id
    );

    Ok(entry_point)
}
