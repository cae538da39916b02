use anyhow::{anyhow, ensure, Result};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

/// Encode one text as `[1,T]` input ids and attention mask, truncated to
/// `max_len` tokens. No padding: a single sequence needs none.
pub fn tokenize_on_device(tokenizer: &Tokenizer, text: &str, max_len: usize, device: &Device) -> Result<(Tensor, Tensor)> {
    let enc = tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let mut ids = enc.get_ids().to_vec();
    let mut mask = enc.get_attention_mask().to_vec();
    if ids.len() > max_len { ids.truncate(max_len); mask.truncate(max_len); }
    ensure!(!ids.is_empty(), "tokenizer produced no tokens");
    let input_ids = Tensor::new(ids.as_slice(), device)?.unsqueeze(0)?;
    let attention_mask = Tensor::new(mask.as_slice(), device)?.unsqueeze(0)?;
    Ok((input_ids, attention_mask))
}
