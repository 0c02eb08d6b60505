//! Cache TTL en memoria
//!
//! Este módulo contiene el cache genérico de páginas crudas del sitio
//! upstream. Una entrada expirada cuenta como miss y se sobreescribe en el
//! próximo fetch; nunca se borra explícitamente (el conjunto de claves son
//! guilds y personajes consultados, acotado en la práctica).

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Entrada del cache con su instante de expiración
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Cache clave → valor con expiración perezosa en lectura
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Retorna el valor si existe y no expiró; expirado == miss
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).and_then(|entry| {
            if Instant::now() < entry.expires_at {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    /// Indica si la clave existe aunque esté expirada (para distinguir
    /// "nunca visto" de "expirado" en los logs)
    pub fn contains_stale(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserta o sobreescribe el valor, reiniciando la expiración
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_after_put_within_ttl_hits() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("Bubble".to_string(), "<html>char</html>".to_string());
        assert_eq!(
            cache.get(&"Bubble".to_string()),
            Some("<html>char</html>".to_string())
        );
    }

    #[test]
    fn expired_entry_is_a_miss_but_stays_stored() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.insert(362u32, "<html>guild</html>".to_string());
        assert_eq!(cache.get(&362), None);
        assert!(cache.contains_stale(&362));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn second_put_overwrites_value_in_place() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(362u32, "old".to_string());
        cache.insert(362u32, "new".to_string());
        assert_eq!(cache.get(&362), Some("new".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn put_resets_expiry_for_stale_entries() {
        let mut cache = TtlCache::new(Duration::from_millis(30));
        cache.insert(362u32, "old".to_string());
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&362), None);

        cache.insert(362u32, "new".to_string());
        assert_eq!(cache.get(&362), Some("new".to_string()));
    }

    #[test]
    fn missing_key_is_a_miss() {
        let cache: TtlCache<String, String> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"Nadie".to_string()), None);
        assert!(cache.is_empty());
    }
}
