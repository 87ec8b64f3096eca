// ============================================================================
// Structure : QueryCache
// ============================================================================
// Cache de requêtes distantes, clé par clé. Chaque entrée expose trois
// états aux écrans : chargement, succès (dernier résultat), erreur.
//
// Règles :
// - au plus un fetch en vol par clé (les abonnés concurrents le partagent)
// - le refetch périodique ne tourne que tant qu'un abonné est présent
// - la valeur en cache survit au départ du dernier abonné
// - chaque fetch émis porte un numéro de séquence monotone ; seul le
//   dernier émis pour une clé peut committer son résultat
//
// Toute la comptabilité est synchrone : le worker exécute les
// FetchRequest émis ici et renvoie les résultats à committer.
// ============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::key::QueryKey;
use super::payload::QueryPayload;

/// Options d'une souscription
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Période de refetch automatique, active tant qu'un abonné est présent
    pub refetch_interval: Option<Duration>,
}

impl QueryOptions {
    /// Souscription avec refetch périodique
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            refetch_interval: Some(interval),
        }
    }
}

/// Fetch à exécuter par le worker, estampillé par le cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub key: QueryKey,
    pub seq: u64,
}

/// État d'une entrée tel que vu par les écrans
///
/// Une erreur survenue alors qu'une valeur est en cache n'est pas un
/// état Error : la valeur périmée reste affichée et l'échec est remonté
/// par last_failure().
#[derive(Debug)]
pub enum QueryState<'a> {
    /// Fetch en vol (ou jamais demandé) et aucune donnée à montrer
    Loading,
    /// Dernier résultat résolu
    Success(&'a QueryPayload),
    /// Dernier fetch échoué, rien en cache à montrer
    Error(&'a str),
}

/// Compteurs pour la ligne de statut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Nombre d'entrées en cache
    pub entries: usize,
    /// Nombre de fetchs en vol
    pub in_flight: usize,
}

/// Une entrée du cache
#[derive(Debug, Default)]
struct QueryEntry {
    /// Dernier résultat réussi, conservé pendant les refetchs
    value: Option<QueryPayload>,
    /// Cause du dernier échec, effacée au prochain succès
    error: Option<String>,
    /// Nombre d'abonnés (écrans montés sur cette clé)
    subscribers: usize,
    /// Refetch périodique de la souscription courante
    refetch_interval: Option<Duration>,
    /// Numéro de séquence du fetch en vol
    in_flight: Option<u64>,
    /// Dernier numéro de séquence émis pour cette clé
    latest_seq: u64,
    /// Prochaine échéance de refetch, armée au commit
    next_refetch_at: Option<Instant>,
}

/// Le cache de requêtes
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, QueryEntry>,
    /// Compteur de séquence partagé, strictement croissant
    next_seq: u64,
    /// Dernier échec committé, pour la ligne de statut
    last_failure: Option<(QueryKey, String)>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre un abonné sur une clé
    ///
    /// Émet un fetch si la clé n'a pas de valeur en cache, ou si un
    /// premier abonné revient sur une valeur en cache (revalidation).
    /// N'émet jamais quand un fetch est déjà en vol : les abonnés
    /// concurrents partagent la même requête.
    ///
    /// # Arguments
    /// * `key` - Clé à souscrire
    /// * `options` - Options de la souscription (refetch périodique)
    ///
    /// # Retourne
    /// * `Option<FetchRequest>` - Le fetch à exécuter, s'il y en a un
    pub fn acquire(&mut self, key: QueryKey, options: QueryOptions) -> Option<FetchRequest> {
        let entry = self.entries.entry(key.clone()).or_default();
        let was_idle = entry.subscribers == 0;
        entry.subscribers += 1;
        if entry.refetch_interval.is_none() {
            entry.refetch_interval = options.refetch_interval;
        }

        if entry.in_flight.is_some() {
            debug!(%key, "Fetch already in flight, subscriber joins it");
            return None;
        }
        if entry.value.is_some() && !was_idle {
            return None;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        entry.latest_seq = seq;
        entry.in_flight = Some(seq);
        debug!(%key, seq, revalidate = entry.value.is_some(), "Issuing fetch");
        Some(FetchRequest { key, seq })
    }

    /// Retire un abonné d'une clé
    ///
    /// Au départ du dernier abonné le refetch périodique s'arrête, mais
    /// la valeur en cache et un éventuel fetch en vol subsistent.
    pub fn release(&mut self, key: &QueryKey) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        entry.subscribers = entry.subscribers.saturating_sub(1);
        if entry.subscribers == 0 {
            entry.refetch_interval = None;
            entry.next_refetch_at = None;
            debug!(%key, "Last subscriber released, refetch timer stopped");
        }
    }

    /// Enregistre le résultat d'un fetch
    ///
    /// Garde de séquence : seul le fetch encore en vol (donc le dernier
    /// émis pour la clé) peut committer. Tout résultat plus ancien ou
    /// dupliqué est jeté. Un échec conserve la valeur en cache.
    ///
    /// # Arguments
    /// * `key` - Clé du fetch
    /// * `seq` - Numéro de séquence porté par le fetch
    /// * `result` - Résultat du fetch (payload ou cause d'échec)
    /// * `now` - Instant du commit, sert à armer le prochain refetch
    ///
    /// # Retourne
    /// * `bool` - true si le résultat a été retenu
    pub fn commit(
        &mut self,
        key: &QueryKey,
        seq: u64,
        result: Result<QueryPayload, String>,
        now: Instant,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            warn!(%key, seq, "Commit for unknown key discarded");
            return false;
        };
        if entry.in_flight != Some(seq) {
            warn!(
                %key,
                seq,
                latest = entry.latest_seq,
                "Out-of-date fetch result discarded"
            );
            return false;
        }

        entry.in_flight = None;
        match result {
            Ok(payload) => {
                entry.value = Some(payload);
                entry.error = None;
                debug!(%key, seq, "Fetch result committed");
            }
            Err(cause) => {
                warn!(%key, seq, cause = %cause, "Fetch failed");
                entry.error = Some(cause.clone());
                self.last_failure = Some((key.clone(), cause));
            }
        }

        if entry.subscribers > 0 {
            if let Some(interval) = entry.refetch_interval {
                entry.next_refetch_at = Some(now + interval);
            }
        }
        true
    }

    /// Émet les refetchs périodiques arrivés à échéance
    ///
    /// Une clé n'est due que si elle a au moins un abonné, un refetch
    /// configuré, aucun fetch en vol et une échéance atteinte.
    ///
    /// # Arguments
    /// * `now` - Instant courant
    ///
    /// # Retourne
    /// * `Vec<FetchRequest>` - Les fetchs à exécuter
    pub fn poll_due(&mut self, now: Instant) -> Vec<FetchRequest> {
        let mut due = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            if entry.subscribers == 0 || entry.in_flight.is_some() {
                continue;
            }
            let Some(deadline) = entry.next_refetch_at else {
                continue;
            };
            if deadline > now {
                continue;
            }

            self.next_seq += 1;
            let seq = self.next_seq;
            entry.latest_seq = seq;
            entry.in_flight = Some(seq);
            entry.next_refetch_at = None;
            debug!(%key, seq, "Refetch due, issuing");
            due.push(FetchRequest {
                key: key.clone(),
                seq,
            });
        }
        due
    }

    /// État d'une clé pour l'affichage
    pub fn state(&self, key: &QueryKey) -> QueryState<'_> {
        match self.entries.get(key) {
            None => QueryState::Loading,
            Some(entry) => {
                if let Some(payload) = &entry.value {
                    QueryState::Success(payload)
                } else if let Some(cause) = &entry.error {
                    QueryState::Error(cause)
                } else {
                    QueryState::Loading
                }
            }
        }
    }

    /// Nombre d'abonnés d'une clé
    pub fn subscribers(&self, key: &QueryKey) -> usize {
        self.entries.get(key).map_or(0, |entry| entry.subscribers)
    }

    /// Compteurs pour la ligne de statut
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            in_flight: self
                .entries
                .values()
                .filter(|entry| entry.in_flight.is_some())
                .count(),
        }
    }

    /// Dernier échec committé, s'il y en a un
    pub fn last_failure(&self) -> Option<(&QueryKey, &str)> {
        self.last_failure
            .as_ref()
            .map(|(key, cause)| (key, cause.as_str()))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
