//! Projeção de uma feature local sobre uma janela de tokens vizinhos.
//!
//! Uma feature disparada na posição `i` é emitida em cada posição `w` da
//! janela com o id `feature + (w - i)`. A distância relativa fica codificada no
//! próprio id, e o classificador distingue "a palavra anterior é X" de "a
//! palavra seguinte é X".

use super::{NerFeature, NER_FEATURE_UNKNOWN};

/// Emite `feature + (w - i)` em cada `w` de `[max(0, i+left), min(n-1, i+right)]`.
///
/// `i` pode estar fora da sentença (posições virtuais antes do início ou
/// depois do fim). Features desconhecidas não são emitidas.
#[inline]
pub fn apply_in_range(
    features: &mut [Vec<NerFeature>],
    i: isize,
    feature: NerFeature,
    left: isize,
    right: isize,
) {
    if feature == NER_FEATURE_UNKNOWN {
        return;
    }

    let start = (i + left).max(0);
    let end = (i + right + 1).min(features.len() as isize);
    for w in start..end {
        features[w as usize].push((feature as isize + w - i) as NerFeature);
    }
}

/// As listas de features de uma sentença, vistas através de uma janela fixa.
pub(crate) struct FeatureWindow<'a> {
    features: &'a mut [Vec<NerFeature>],
    window: isize,
}

impl<'a> FeatureWindow<'a> {
    pub(crate) fn new(features: &'a mut [Vec<NerFeature>], window: u32) -> Self {
        Self {
            features,
            window: window as isize,
        }
    }

    /// Aplica em `[i - window, i + window]`.
    #[inline]
    pub(crate) fn apply(&mut self, i: usize, feature: NerFeature) {
        self.apply_at(i as isize, feature);
    }

    #[inline]
    fn apply_at(&mut self, i: isize, feature: NerFeature) {
        apply_in_range(self.features, i, feature, -self.window, self.window);
    }

    /// Aplica em `[i + left, i + right]`, ignorando a janela simétrica.
    #[inline]
    pub(crate) fn apply_range(&mut self, i: usize, feature: NerFeature, left: isize, right: isize) {
        apply_in_range(self.features, i as isize, feature, left, right);
    }

    /// Aplica `feature` a partir das `window` posições virtuais antes do início
    /// e depois do fim da sentença (marcadores de borda).
    pub(crate) fn apply_outer_words(&mut self, feature: NerFeature) {
        if feature == NER_FEATURE_UNKNOWN {
            return;
        }

        let last = self.features.len() as isize - 1;
        for k in 1..=self.window {
            self.apply_at(-k, feature);
            self.apply_at(last + k, feature);
        }
    }
}
