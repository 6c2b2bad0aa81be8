use anchor_lang::prelude::*;

use crate::constants::MAX_SWAP_HOPS;
use crate::errors::ErrorCode;

/// Declarative conversion route for one (src, dst) token pair of one
/// strategy: the ordered pool accounts the router hops through. Purely
/// configuration; consumed by the router adapter during harvest.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct SwapPath {
    pub strategy: Pubkey,
    pub src_mint: Pubkey,
    pub dst_mint: Pubkey,
    #[max_len(MAX_SWAP_HOPS)]
    pub hops: Vec<Pubkey>,
}

impl SwapPath {
    pub fn init(&mut self, strategy: Pubkey, src_mint: Pubkey, dst_mint: Pubkey) -> Result<()> {
        self.strategy = strategy;
        self.src_mint = src_mint;
        self.dst_mint = dst_mint;
        self.hops = Vec::new();
        Ok(())
    }

    pub fn set_hops(&mut self, hops: Vec<Pubkey>) -> Result<()> {
        require!(
            !hops.is_empty() && hops.len() <= MAX_SWAP_HOPS,
            ErrorCode::InvalidSwapPath
        );
        self.hops = hops;
        Ok(())
    }

    /// Loads the path for a required conversion, failing closed when no
    /// usable path was configured for this exact (strategy, src, dst).
    pub fn load_required(
        info: &AccountInfo,
        strategy: Pubkey,
        src_mint: Pubkey,
        dst_mint: Pubkey,
    ) -> Result<SwapPath> {
        if info.owner != &crate::ID {
            return Err(ErrorCode::MissingSwapPath.into());
        }
        let data = info.try_borrow_data()?;
        let path = SwapPath::try_deserialize(&mut &data[..])
            .map_err(|_| error!(ErrorCode::MissingSwapPath))?;
        require!(
            path.strategy == strategy && path.src_mint == src_mint && path.dst_mint == dst_mint,
            ErrorCode::MissingSwapPath
        );
        require!(!path.hops.is_empty(), ErrorCode::MissingSwapPath);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hops_must_be_bounded_and_non_empty() {
        let mut path = SwapPath::default();
        assert!(path.set_hops(vec![]).is_err());
        assert!(path
            .set_hops(vec![Pubkey::new_unique(); MAX_SWAP_HOPS + 1])
            .is_err());
        assert!(path.set_hops(vec![Pubkey::new_unique()]).is_ok());
        assert_eq!(path.hops.len(), 1);
    }
}
