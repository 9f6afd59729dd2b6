//! Demo content inserted into an empty store.

use chrono::Utc;
use tracing::info;

use super::service::ContentService;
use super::types::{new_id, Category, Challenge, Ctf, Social, TeamMember};
use crate::Result;

struct SeedCtf {
    slug: &'static str,
    name: &'static str,
    banner_url: &'static str,
    description: &'static str,
}

struct SeedChallenge {
    ctf_slug: &'static str,
    title: &'static str,
    category: Category,
    description: &'static str,
    writeup: &'static str,
}

struct SeedMember {
    name: &'static str,
    handle: &'static str,
    role: &'static str,
    avatar_url: &'static str,
}

const CTFS: &[SeedCtf] = &[
    SeedCtf {
        slug: "functf-2024",
        name: "FuncTF 2024",
        banner_url: "https://picsum.photos/1200/400",
        description: "A beginner-friendly CTF with a variety of challenges.",
    },
    SeedCtf {
        slug: "securinets-ctf-2023",
        name: "Securinets CTF 2023",
        banner_url: "https://picsum.photos/1200/401",
        description: "A competitive CTF focused on advanced pwn and web exploitation.",
    },
    SeedCtf {
        slug: "cybertalents-ctf-2023",
        name: "CyberTalents CTF 2023",
        banner_url: "https://picsum.photos/1200/402",
        description: "A jeopardy-style CTF covering all major security categories.",
    },
];

const CHALLENGES: &[SeedChallenge] = &[
    SeedChallenge {
        ctf_slug: "functf-2024",
        title: "Web Warmup",
        category: Category::Web,
        description: "A simple challenge to get you started with web exploitation.",
        writeup: r#"# Web Warmup Write-up

This was a straightforward challenge. The goal was to find a hidden flag on the page.

1.  **Initial Recon:** I inspected the page source (Ctrl+U).
2.  **Finding Comments:** I looked for HTML comments and found one that contained a base64 encoded string.
3.  **Decoding:** I decoded the string using an online tool, which revealed the flag.

Flag: `functf{w3b_is_fun}`
"#,
    },
    SeedChallenge {
        ctf_slug: "functf-2024",
        title: "Login Bypass",
        category: Category::Web,
        description: "Bypass the login form to get the flag.",
        writeup: r#"# Login Bypass Write-up

The login form was vulnerable to a classic SQL injection.

1.  **Testing Injection:** I tried common SQLi payloads in the username field.
2.  **Successful Payload:** The payload `' OR '1'='1` worked.
3.  **Access Granted:** This bypassed the authentication and logged me in as the admin, where the flag was displayed.

Flag: `functf{sql_injection_ftw}`
"#,
    },
    SeedChallenge {
        ctf_slug: "functf-2024",
        title: "RSA Basics",
        category: Category::Crypto,
        description: "A simple RSA challenge with small primes.",
        writeup: r#"# RSA Basics Write-up

The challenge provided N, e, and the ciphertext c.

1.  **Factoring N:** Since N was small, I used an online tool (like Factordb) to find the prime factors p and q.
2.  **Calculating Phi:** I calculated phi(n) = (p-1) * (q-1).
3.  **Finding Private Key:** I calculated the private key d, which is the modular multiplicative inverse of e modulo phi(n).
4.  **Decrypting:** Finally, I decrypted the message using the formula m = c^d mod n.

Flag: `functf{rsa_is_not_so_h4rd}`
"#,
    },
    SeedChallenge {
        ctf_slug: "securinets-ctf-2023",
        title: "Pwn Me",
        category: Category::Pwn,
        description: "A buffer overflow challenge.",
        writeup: r#"# Pwn Me Write-up

This was a classic buffer overflow.

1.  **Finding the Offset:** I used gdb with gef to create a pattern and find the exact offset to overwrite the return address.
2.  **Shellcode:** I used a standard x86_64 shellcode to pop a shell.
3.  **Exploitation:** I crafted the final exploit payload: NOP sled + shellcode + saved EIP overwrite. Running it gave me a shell on the server.

Flag: `securinets{pwn_all_the_things}`
"#,
    },
];

const MEMBERS: &[SeedMember] = &[
    SeedMember {
        name: "T3chC0brA",
        handle: "@T3chC0brA",
        role: "Team Lead & Pwn Expert",
        avatar_url: "https://picsum.photos/200/200",
    },
    SeedMember {
        name: "Cryp70K1n9",
        handle: "@Cryp70K1n9",
        role: "Crypto Specialist",
        avatar_url: "https://picsum.photos/201/201",
    },
    SeedMember {
        name: "WebSlinger",
        handle: "@WebSlinger",
        role: "Web Exploitation Guru",
        avatar_url: "https://picsum.photos/202/202",
    },
    SeedMember {
        name: "RevEngeR",
        handle: "@RevEngeR",
        role: "Reverse Engineering Pro",
        avatar_url: "https://picsum.photos/203/203",
    },
];

impl ContentService {
    /// Insert the demo content when all collections are empty.
    ///
    /// Returns `true` if anything was inserted.
    pub async fn seed_defaults(&self) -> Result<bool> {
        if !self.is_empty().await? {
            return Ok(false);
        }

        let now = Utc::now();
        let mut ctf_ids = Vec::with_capacity(CTFS.len());
        for seed in CTFS {
            let ctf = self
                .ctf_repository()
                .insert(Ctf {
                    id: new_id(),
                    slug: seed.slug.to_string(),
                    name: seed.name.to_string(),
                    description: seed.description.to_string(),
                    banner_url: seed.banner_url.to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;
            ctf_ids.push((seed.slug, ctf.id));
        }

        for seed in CHALLENGES {
            let Some((_, ctf_id)) = ctf_ids.iter().find(|(slug, _)| *slug == seed.ctf_slug) else {
                continue;
            };
            self.challenge_repository()
                .insert(Challenge {
                    id: new_id(),
                    ctf_id: ctf_id.clone(),
                    title: seed.title.to_string(),
                    category: seed.category,
                    description: seed.description.to_string(),
                    writeup: seed.writeup.to_string(),
                    image_url: None,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }

        for seed in MEMBERS {
            self.member_repository()
                .insert(TeamMember {
                    id: new_id(),
                    name: seed.name.to_string(),
                    role: seed.role.to_string(),
                    social: Social {
                        twitter: seed.handle.to_string(),
                        ..Default::default()
                    },
                    avatar_url: seed.avatar_url.to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }

        info!(
            ctfs = CTFS.len(),
            challenges = CHALLENGES.len(),
            members = MEMBERS.len(),
            "Seeded default content"
        );
        Ok(true)
    }
}
