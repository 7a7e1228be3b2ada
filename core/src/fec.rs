//! Length-scaled Reed-Solomon forward error correction.
//!
//! Systematic RS over GF(2^8) with a fixed 255-symbol codeword and first
//! consecutive root 1. The transmitted block is a shortened code: the payload
//! occupies the head of the data region, the rest of the data region is zero
//! padding that never goes on the air, and only the trailing parity symbols
//! follow the payload. Parity length is a pure function of payload length, so
//! the decoder recomputes it from the declared length with no side channel.

use crate::error::{ModemError, Result};
use crate::{MAX_PARITY, MAX_PAYLOAD_SIZE, MIN_PARITY, RS_CODEWORD_LEN};

/// Parity symbol count for a payload length, interpolated linearly between
/// [`MIN_PARITY`] and [`MAX_PARITY`] over the 1..=[`MAX_PAYLOAD_SIZE`] range.
/// Monotone non-decreasing; shorter messages get relatively more redundancy.
pub fn parity_length(payload_len: usize) -> usize {
    debug_assert!((1..=MAX_PAYLOAD_SIZE).contains(&payload_len));
    MIN_PARITY + (payload_len - 1) * (MAX_PARITY - MIN_PARITY) / (MAX_PAYLOAD_SIZE - 1)
}

/// Primitive polynomial for GF(2^8): x^8 + x^4 + x^3 + x^2 + 1.
const PRIM_POLY: u16 = 0x11D;

/// First consecutive root of the generator polynomial. Both ends must agree
/// on this for the parity symbols to match.
const FIRST_ROOT: usize = 1;

/// GF(2^8) exp/log tables. The exp table is doubled so products of two logs
/// index it without a modulo.
struct Gf256 {
    exp: [u8; 512],
    log: [u16; 256],
}

impl Gf256 {
    fn new() -> Self {
        let mut exp = [0u8; 512];
        let mut log = [0u16; 256];

        let mut x: u16 = 1;
        for i in 0..255u16 {
            exp[i as usize] = x as u8;
            log[x as usize] = i;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIM_POLY;
            }
        }
        for i in 255..512 {
            exp[i] = exp[i - 255];
        }

        Self { exp, log }
    }

    fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp[self.log[a as usize] as usize + self.log[b as usize] as usize]
    }

    fn div(&self, a: u8, b: u8) -> u8 {
        debug_assert!(b != 0);
        if a == 0 {
            return 0;
        }
        let idx = (self.log[a as usize] as usize + 255 - self.log[b as usize] as usize) % 255;
        self.exp[idx]
    }

    fn pow(&self, a: u8, p: usize) -> u8 {
        if a == 0 {
            return 0;
        }
        self.exp[(self.log[a as usize] as usize * p) % 255]
    }

    /// Horner evaluation; `poly[0]` holds the highest-degree coefficient.
    fn eval_msb_first(&self, poly: &[u8], x: u8) -> u8 {
        let mut acc = 0u8;
        for &coeff in poly {
            acc = self.mul(acc, x) ^ coeff;
        }
        acc
    }

    /// Evaluation with `poly[0]` as the constant term.
    fn eval_lsb_first(&self, poly: &[u8], x: u8) -> u8 {
        let mut acc = 0u8;
        let mut x_pow = 1u8;
        for &coeff in poly {
            acc ^= self.mul(coeff, x_pow);
            x_pow = self.mul(x_pow, x);
        }
        acc
    }
}

/// RS(255, 255 - parity) codec for one parity length.
pub struct ReedSolomon {
    parity_len: usize,
    data_len: usize,
    gf: Gf256,
    /// Generator polynomial, highest degree first.
    generator: Vec<u8>,
}

impl ReedSolomon {
    pub fn new(parity_len: usize) -> Self {
        debug_assert!((1..RS_CODEWORD_LEN).contains(&parity_len));
        let gf = Gf256::new();
        let generator = Self::build_generator(&gf, parity_len);
        Self {
            parity_len,
            data_len: RS_CODEWORD_LEN - parity_len,
            gf,
            generator,
        }
    }

    /// Codec sized for a payload of `payload_len` bytes.
    pub fn for_payload_len(payload_len: usize) -> Self {
        Self::new(parity_length(payload_len))
    }

    pub fn parity_len(&self) -> usize {
        self.parity_len
    }

    /// Correctable symbol errors per codeword.
    pub fn max_errors(&self) -> usize {
        self.parity_len / 2
    }

    /// g(x) = prod_{i=0}^{parity-1} (x - alpha^(FIRST_ROOT + i))
    fn build_generator(gf: &Gf256, parity_len: usize) -> Vec<u8> {
        let mut gen = vec![0u8; parity_len + 1];
        gen[parity_len] = 1;

        for i in 0..parity_len {
            let root = gf.exp[(FIRST_ROOT + i) % 255];
            let mut next = vec![0u8; parity_len + 1];
            for j in 0..=parity_len {
                if gen[j] != 0 {
                    if j > 0 {
                        next[j - 1] ^= gen[j];
                    }
                    next[j] ^= gf.mul(gen[j], root);
                }
            }
            gen = next;
        }

        gen
    }

    /// Encode a payload, returning `payload ++ parity`.
    ///
    /// The payload sits at the head of the data region; the zero padding up
    /// to the full data length contributes to the division but is not
    /// transmitted.
    pub fn encode(&self, payload: &[u8]) -> Vec<u8> {
        debug_assert!(payload.len() <= self.data_len);

        let mut remainder = vec![0u8; self.parity_len];
        for i in 0..self.data_len {
            let data = payload.get(i).copied().unwrap_or(0);
            let feedback = data ^ remainder[0];
            remainder.rotate_left(1);
            remainder[self.parity_len - 1] = 0;
            if feedback != 0 {
                for j in 0..self.parity_len {
                    remainder[j] ^= self.gf.mul(feedback, self.generator[j + 1]);
                }
            }
        }

        let mut out = payload.to_vec();
        out.extend_from_slice(&remainder);
        out
    }

    /// Decode `received = payload ++ parity` with the declared payload
    /// length, correcting up to `parity_len / 2` symbol errors.
    ///
    /// Fails with [`ModemError::FecDecodeFailure`] whenever the observed
    /// errors exceed that bound; never returns partially corrected data.
    pub fn decode(&self, received: &[u8], declared_len: usize) -> Result<Vec<u8>> {
        if received.len() != declared_len + self.parity_len || declared_len > self.data_len {
            return Err(ModemError::FecDecodeFailure);
        }

        // Rebuild the full codeword: payload, zero padding, parity
        // right-aligned exactly as during encode.
        let mut codeword = vec![0u8; RS_CODEWORD_LEN];
        codeword[..declared_len].copy_from_slice(&received[..declared_len]);
        codeword[self.data_len..].copy_from_slice(&received[declared_len..]);

        let syndromes = self.syndromes(&codeword);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(codeword[..declared_len].to_vec());
        }

        let sigma = self.berlekamp_massey(&syndromes)?;
        let positions = self.chien_search(&sigma)?;
        let magnitudes = self.forney(&syndromes, &sigma, &positions)?;

        for (&pos, &mag) in positions.iter().zip(magnitudes.iter()) {
            codeword[pos] ^= mag;
        }

        // A beyond-capacity pattern can land on a different valid codeword;
        // residual syndromes or corrections inside the zero padding both
        // expose that case.
        let check = self.syndromes(&codeword);
        if !check.iter().all(|&s| s == 0) {
            log::debug!("rs decode: residual syndromes after correction");
            return Err(ModemError::FecDecodeFailure);
        }
        if codeword[declared_len..self.data_len].iter().any(|&b| b != 0) {
            log::debug!("rs decode: correction spilled into padding");
            return Err(ModemError::FecDecodeFailure);
        }

        Ok(codeword[..declared_len].to_vec())
    }

    /// S_i = codeword(alpha^(FIRST_ROOT + i)) for i in 0..parity.
    fn syndromes(&self, codeword: &[u8]) -> Vec<u8> {
        (0..self.parity_len)
            .map(|i| {
                let root = self.gf.exp[(FIRST_ROOT + i) % 255];
                self.gf.eval_msb_first(codeword, root)
            })
            .collect()
    }

    /// Error locator polynomial via Berlekamp-Massey, constant term first.
    fn berlekamp_massey(&self, syndromes: &[u8]) -> Result<Vec<u8>> {
        let nsym = syndromes.len();

        let mut c = vec![0u8; nsym + 1];
        c[0] = 1;
        let mut b = vec![0u8; nsym + 1];
        b[0] = 1;

        let mut l = 0usize;
        let mut m = 1usize;
        let mut prev_disc = 1u8;

        for n in 0..nsym {
            let mut d = syndromes[n];
            for i in 1..=l {
                d ^= self.gf.mul(c[i], syndromes[n - i]);
            }

            if d == 0 {
                m += 1;
            } else if 2 * l <= n {
                let t = c.clone();
                let coeff = self.gf.div(d, prev_disc);
                for i in 0..=nsym {
                    if i + m <= nsym {
                        c[i + m] ^= self.gf.mul(coeff, b[i]);
                    }
                }
                l = n + 1 - l;
                b = t;
                prev_disc = d;
                m = 1;
            } else {
                let coeff = self.gf.div(d, prev_disc);
                for i in 0..=nsym {
                    if i + m <= nsym {
                        c[i + m] ^= self.gf.mul(coeff, b[i]);
                    }
                }
                m += 1;
            }
        }

        let degree = c.iter().rposition(|&x| x != 0).unwrap_or(0);
        c.truncate(degree + 1);

        if c.len() - 1 > self.max_errors() {
            log::debug!("rs decode: locator degree {} exceeds capacity", c.len() - 1);
            return Err(ModemError::FecDecodeFailure);
        }

        Ok(c)
    }

    /// Find the error positions as codeword indices by testing every field
    /// element against the locator polynomial.
    fn chien_search(&self, sigma: &[u8]) -> Result<Vec<usize>> {
        let num_errors = sigma.len() - 1;
        let mut positions = Vec::with_capacity(num_errors);

        for i in 0..RS_CODEWORD_LEN {
            let x = self.gf.exp[i % 255];
            if self.gf.eval_lsb_first(sigma, x) == 0 {
                // Root alpha^i locates the symbol with power (255 - i) % 255,
                // stored at index n-1-power.
                let power = (255 - i) % 255;
                positions.push(RS_CODEWORD_LEN - 1 - power);
            }
        }

        if positions.len() != num_errors {
            log::debug!(
                "rs decode: chien search found {} roots, expected {num_errors}",
                positions.len()
            );
            return Err(ModemError::FecDecodeFailure);
        }

        positions.sort_unstable();
        Ok(positions)
    }

    /// Error magnitudes at known positions via the Forney algorithm.
    fn forney(&self, syndromes: &[u8], sigma: &[u8], positions: &[usize]) -> Result<Vec<u8>> {
        // Omega(x) = S(x) * sigma(x) mod x^parity
        let mut omega = vec![0u8; self.parity_len];
        for i in 0..self.parity_len {
            for j in 0..sigma.len().min(i + 1) {
                omega[i] ^= self.gf.mul(sigma[j], syndromes[i - j]);
            }
        }

        let mut magnitudes = Vec::with_capacity(positions.len());
        for &pos in positions {
            let power = RS_CODEWORD_LEN - 1 - pos;
            let x_inv = self.gf.exp[(255 - power) % 255];

            let omega_val = self.gf.eval_lsb_first(&omega, x_inv);

            // Formal derivative keeps only odd-degree terms in GF(2^m).
            let mut sigma_prime = 0u8;
            for k in (1..sigma.len()).step_by(2) {
                sigma_prime ^= self.gf.mul(sigma[k], self.gf.pow(x_inv, k - 1));
            }
            if sigma_prime == 0 {
                return Err(ModemError::FecDecodeFailure);
            }

            // With FIRST_ROOT = 1 the X_j^(1-fcr) factor is identity.
            magnitudes.push(self.gf.div(omega_val, sigma_prime));
        }

        Ok(magnitudes)
    }
}
