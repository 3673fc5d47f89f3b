/// AccessPolicy はルートごとに宣言された許可ロール一覧に対する認可判定を提供する。
/// rbac middleware の inline 判定をドメインサービスとして整理したもの。
pub struct AccessPolicy;

impl AccessPolicy {
    /// 主体のロールが許可一覧に含まれるかを判定する。
    /// ロールクレームが無い主体は常に拒否する（クラッシュさせない）。
    pub fn is_allowed(role: Option<&str>, allowed: &[&str]) -> bool {
        match role {
            Some(role) => allowed.iter().any(|a| *a == role),
            None => false,
        }
    }
}
