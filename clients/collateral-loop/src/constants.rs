// Lending program PDA seeds
pub const RESERVE_SEED: &[u8] = b"reserve";
pub const RESERVE_VAULT_SEED: &[u8] = b"reserve_vault";
pub const OBLIGATION_SEED: &[u8] = b"obligation";

// Anchor account names on the lending program
pub const REGISTRY_ACCOUNT_NAME: &str = "LendingRegistry";
pub const OBLIGATION_ACCOUNT_NAME: &str = "Obligation";

// Workflow Parameters (basis points)
pub const DEFAULT_SAFETY_MARGIN_BPS: u16 = 9500; // borrow 95% of capacity
pub const DEFAULT_REFERRAL_CODE: u16 = 0;

// Oracle Parameters
pub const MAX_CONFIDENCE_DEVIATION_BPS: u16 = 200; // 2% max price confidence deviation
pub const MAX_ORACLE_AGE_SECS: u64 = 60;

// Precision Constants
pub const BPS_PRECISION: u64 = 10_000;
pub const WAD_PRECISION: u128 = 1_000_000_000_000_000_000; // 18 decimals for health factor
pub const MAX_DECIMALS: u8 = 18;

// Token Decimals
pub const SOL_DECIMALS: u8 = 9;
pub const USDC_DECIMALS: u8 = 6;
pub const VALUATION_DECIMALS: u8 = 6; // pool values are USD with 6 decimals

// Limits
pub const DEFAULT_WRAP_AMOUNT: u64 = 20_000_000; // 0.02 SOL

// Confirmation
pub const CONFIRM_TIMEOUT_SECS: u64 = 60;
pub const CONFIRM_POLL_MILLIS: u64 = 500;

// Well-known addresses (mainnet-beta)
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const USDC_USD_FEED: &str = "Gnt27xtC473ZT2Mw5u8wZ68Z3gULkSTb5DuxJy7eJotD";
pub const PYTH_PROGRAM: &str = "FsJ3A3u2vn5cTVofAjvy6y5kwABJAqYWpe4975bi2epH";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";
