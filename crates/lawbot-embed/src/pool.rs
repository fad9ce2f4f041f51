use anyhow::{anyhow, ensure, Result};
use candle_core::Tensor;

/// Sentence vectors from token states: average the positions the mask keeps,
/// then scale each row to unit length. `[B,T,H]` and `[B,T]` give `[B,H]`.
///
/// Rows whose mask is all zero come back as zero vectors.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let (batch, _, hidden_dim) = hidden
        .dims3()
        .map_err(|_| anyhow!("hidden states must be [batch, tokens, hidden], got {:?}", hidden.dims()))?;
    let keep = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?.unsqueeze(2)?;

    let summed = hidden.broadcast_mul(&keep)?.sum(1)?;
    let kept = keep.sum(1)?.maximum(1.0)?;
    let mean = summed.broadcast_div(&kept)?;

    let length = mean.sqr()?.sum_keepdim(1)?.sqrt()?.maximum(1e-12)?;
    let pooled = mean.broadcast_div(&length)?;
    ensure!(pooled.dims() == [batch, hidden_dim], "pooled shape {:?} != [{}, {}]", pooled.dims(), batch, hidden_dim);
    Ok(pooled)
}
